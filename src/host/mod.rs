//! Headless host that drives the world at a fixed rate.
//!
//! The host owns the arena size and pacing, turns the world's one-shot birth
//! flags and id-set differences into [`LiveEvent`]s, and publishes snapshots
//! to a [`SnapshotSink`] at the broadcast cadence.

pub mod sink;

pub use sink::{JsonLinesSink, MemorySink, NullSink, SnapshotSink};

use anyhow::Result;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use swimbots_core::config::{AppConfig, HostConfig};
use swimbots_core::{Metrics, World};
use swimbots_data::{AgentId, LiveEvent};
use tokio::time::MissedTickBehavior;

pub struct Host<S: SnapshotSink = Box<dyn SnapshotSink>> {
    world: World,
    config: HostConfig,
    sink: S,
    metrics: Metrics,
    known_ids: HashSet<AgentId>,
    width: f64,
    height: f64,
}

impl<S: SnapshotSink> Host<S> {
    /// Validates the configuration, builds the world and seeds its initial
    /// population.
    pub fn new(config: AppConfig, sink: S) -> Result<Self> {
        config.validate()?;
        let (width, height) = (config.world.arena_width, config.world.arena_height);
        let mut world = World::new(config.world)?;
        world.reset();
        let known_ids = world.agent_ids();
        Ok(Self {
            world,
            config: config.host,
            sink,
            metrics: Metrics::new(),
            known_ids,
            width,
            height,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Changes the arena used from the next tick on.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.config.tick_rate_hz)
    }

    /// Ticks between two snapshots, at least one.
    fn broadcast_every(&self) -> u64 {
        let tick_ms = 1000.0 / f64::from(self.config.tick_rate_hz);
        ((self.config.broadcast_interval_ms as f64 / tick_ms).round() as u64).max(1)
    }

    /// Birth events from the newborn flags, then death events from the ids
    /// that vanished since the previous call.
    fn collect_events(&mut self) -> Vec<LiveEvent> {
        let tick = self.world.tick;
        let timestamp = chrono::Utc::now().to_rfc3339();
        let mut events: Vec<LiveEvent> = self
            .world
            .take_newborns()
            .into_iter()
            .map(|birth| LiveEvent::Birth {
                id: birth.id,
                parent_ids: birth
                    .parents
                    .map(|(a, b)| vec![a, b])
                    .unwrap_or_default(),
                generation: birth.generation,
                tick,
                timestamp: timestamp.clone(),
            })
            .collect();

        let current = self.world.agent_ids();
        let mut dead: Vec<AgentId> = self.known_ids.difference(&current).copied().collect();
        dead.sort_unstable();
        events.extend(dead.into_iter().map(|id| LiveEvent::Death {
            id,
            tick,
            timestamp: timestamp.clone(),
        }));
        self.known_ids = current;
        events
    }

    /// Runs one simulation step and publishes what it produced.
    pub async fn tick(&mut self) -> Result<Vec<LiveEvent>> {
        let started = Instant::now();
        let dt = self.dt();
        self.world
            .step(dt, self.width, self.height, self.config.food_rate);
        let events = self.collect_events();

        let stats = self.world.stats();
        self.metrics
            .record_tick(started.elapsed(), stats.total, stats.food);
        for event in &events {
            let counter = match event {
                LiveEvent::Birth { .. } => "births",
                LiveEvent::Death { .. } => "deaths",
            };
            self.metrics.increment_counter(counter, 1);
            self.sink.publish_event(event).await?;
        }

        let tick = self.world.tick;
        if tick % self.broadcast_every() == 0 {
            let snapshot = self.world.snapshot().truncated(
                self.config.max_broadcast_agents,
                self.config.max_broadcast_food,
            );
            self.sink.publish_snapshot(&snapshot).await?;
        }

        if self.config.stats_interval_ticks > 0 && tick % self.config.stats_interval_ticks == 0 {
            tracing::info!(
                tick,
                time = stats.time,
                total = stats.total,
                adults = stats.adults,
                children = stats.children,
                food = stats.food,
                max_generation = stats.max_generation,
                births = self.metrics.counter("births"),
                deaths = self.metrics.counter("deaths"),
                "Population stats"
            );
        }
        Ok(events)
    }

    /// Runs `ticks` steps, or forever when `None`. With `realtime` the loop is
    /// paced by a tokio interval at the configured tick rate; otherwise it
    /// runs as fast as possible.
    pub async fn run(&mut self, ticks: Option<u64>, realtime: bool) -> Result<()> {
        let mut interval = tokio::time::interval(Duration::from_secs_f64(self.dt()));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut done = 0u64;
        while ticks.map_or(true, |n| done < n) {
            if realtime {
                interval.tick().await;
            } else if done % 256 == 0 {
                tokio::task::yield_now().await;
            }
            self.tick().await?;
            done += 1;
        }
        self.sink.flush().await?;
        tracing::info!(
            ticks = done,
            elapsed_ms = self.metrics.elapsed().as_millis() as u64,
            "Host finished"
        );
        Ok(())
    }
}
