//! Agent state, derived phenotype and motion integration.
//!
//! Behavior decisions live in the world (they need the spatial indices);
//! everything here only touches the agent itself.

use crate::math::{clamp, lerp, rand_range, wrap_angle, TAU};
use rand::Rng;
use swimbots_data::{AgentId, AgentSnapshot, BehaviorState, FoodId, Genome};
use uuid::Uuid;

const NAME_PREFIXES: [&str; 15] = [
    "Aqua", "Fin", "Swim", "Wave", "Coral", "Blue", "Pearl", "Tide", "Ocean", "Nano", "Micro",
    "Zen", "Neo", "Pixel", "Cyber",
];
const NAME_SUFFIXES: [&str; 15] = [
    "bot", "fish", "ling", "ie", "y", "er", "o", "fin", "tail", "wave", "bit", "byte", "chip",
    "core", "flux",
];

/// Fraction of capacity an agent starts with when seeded.
pub const SEEDED_ENERGY_FRACTION: f64 = 0.7;
/// Fraction of capacity a newborn starts with.
pub const CHILD_ENERGY_FRACTION: f64 = 0.55;

/// Desired heading and speed produced by the behavior layer for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub dir: f64,
    pub speed: f64,
}

/// Movement tuning fixed at birth from the genome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub base_speed: f64,
    pub max_turn_rate: f64,
    pub drag: f64,
    pub wander_freq: f64,
    pub wander_amp: f64,
}

impl MotionParams {
    pub fn from_genome(genome: &Genome) -> Self {
        let t = &genome.traits;
        let fin_speed = t.e * 0.3 + t.o * 0.2;
        let fin_stability = t.c * 0.4 - t.n * 0.2;
        Self {
            base_speed: (28.0 + genome.body_size * 1.6) * (0.8 + 0.5 * t.e) * (1.0 + fin_speed),
            max_turn_rate: (1.6 - 0.7 * t.c) + 0.8 * t.n - fin_stability,
            drag: 0.9 + t.a * 0.1,
            wander_freq: lerp(0.5, 1.4, t.o),
            wander_amp: lerp(0.05, 0.35, t.o) + lerp(0.0, 0.15, t.n) - t.c * 0.08,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub x: f64,
    pub y: f64,
    /// Radians.
    pub heading: f64,
    pub vx: f64,
    pub vy: f64,
    pub genome: Genome,
    pub age: f64,
    pub adult_age: f64,
    pub max_age: f64,
    pub energy: f64,
    pub energy_max: f64,
    pub state: BehaviorState,
    /// Seconds since the last state entry that resets it.
    pub state_timer: f64,
    pub mate_cooldown: f64,
    pub target: Option<FoodId>,
    pub partner: Option<AgentId>,
    pub generation: u32,
    pub parents: Option<(AgentId, AgentId)>,
    /// One-shot flag for the host; see [`crate::World::take_newborns`].
    pub just_born: bool,
    pub motion: MotionParams,
    pub wander_phase: f64,
    /// Cleared when the agent dies mid-tick; dead agents are swept after the
    /// agent loop and are invisible to queries until then.
    pub alive: bool,
}

impl Agent {
    fn build<R: Rng>(x: f64, y: f64, genome: Genome, energy_fraction: f64, rng: &mut R) -> Self {
        let id = Uuid::from_u128(rng.gen::<u128>());
        let heading = rand_range(rng, 0.0, TAU);
        let wander_phase = rand_range(rng, 0.0, TAU);
        let energy_max = 70.0 + genome.body_size * 4.0;
        Self {
            id,
            x,
            y,
            heading,
            vx: 0.0,
            vy: 0.0,
            adult_age: 6.0 + genome.body_size * 0.1,
            max_age: genome.lifespan,
            energy: energy_max * energy_fraction,
            energy_max,
            state: BehaviorState::SeekFood,
            state_timer: 0.0,
            mate_cooldown: 0.0,
            target: None,
            partner: None,
            generation: 0,
            parents: None,
            just_born: false,
            motion: MotionParams::from_genome(&genome),
            genome,
            age: 0.0,
            wander_phase,
            alive: true,
        }
    }

    /// Creates a generation-zero agent.
    pub fn new_with_rng<R: Rng>(x: f64, y: f64, genome: Genome, rng: &mut R) -> Self {
        Self::build(x, y, genome, SEEDED_ENERGY_FRACTION, rng)
    }

    /// Creates a newborn of `a` and `b`, flagged `just_born`.
    pub fn new_child_with_rng<R: Rng>(
        x: f64,
        y: f64,
        genome: Genome,
        a: &Agent,
        b: &Agent,
        rng: &mut R,
    ) -> Self {
        let mut child = Self::build(x, y, genome, CHILD_ENERGY_FRACTION, rng);
        child.generation = a.generation.max(b.generation) + 1;
        child.parents = Some((a.id, b.id));
        child.just_born = true;
        child
    }

    #[inline]
    pub fn is_adult(&self) -> bool {
        self.age >= self.adult_age
    }

    /// Visual radius. Juveniles grow from 35% of body size up to full size.
    pub fn size(&self) -> f64 {
        let t = if self.is_adult() {
            1.0
        } else {
            clamp(self.age / self.adult_age, 0.35, 1.0)
        };
        self.genome.body_size * t
    }

    #[inline]
    pub fn hue(&self) -> f64 {
        self.genome.hue
    }

    pub fn name(&self) -> String {
        let pick = |v: f64, len: usize| ((v * len as f64).floor() as usize).min(len - 1);
        let prefix = NAME_PREFIXES[pick(self.genome.traits.o, NAME_PREFIXES.len())];
        let suffix = NAME_SUFFIXES[pick(self.genome.traits.e, NAME_SUFFIXES.len())];
        format!("{prefix}{suffix}")
    }

    pub fn state_label(&self) -> String {
        if self.is_adult() {
            self.state.as_str().to_string()
        } else {
            format!("{} (child)", self.state.as_str())
        }
    }

    pub fn energy_ratio(&self) -> f64 {
        if self.energy_max > 0.0 {
            self.energy / self.energy_max
        } else {
            0.0
        }
    }

    /// Energy above which the agent stops foraging.
    pub fn satiety(&self) -> f64 {
        let t = &self.genome.traits;
        self.energy_max * (0.55 + 0.3 * t.c - 0.15 * t.n)
    }

    /// Per-tick chance of leaving `JustAte` to keep eating.
    pub fn greed(&self) -> f64 {
        let t = &self.genome.traits;
        0.15 + 0.5 * t.n - 0.2 * t.c
    }

    /// Chance of conceding a contested pellet to a closer rival.
    pub fn contest_yield(&self) -> f64 {
        let t = &self.genome.traits;
        0.3 + 0.6 * t.a - 0.2 * t.e
    }

    pub fn food_search_radius(&self) -> f64 {
        240.0 + 200.0 * self.genome.traits.o
    }

    pub fn explore_bias(&self) -> f64 {
        0.2 + 0.8 * self.genome.traits.o
    }

    pub fn has_mating_energy(&self) -> bool {
        self.energy >= self.energy_max * 0.7
    }

    /// Advances the wander oscillator and returns the wander heading.
    pub fn advance_wander(&mut self, dt: f64) -> f64 {
        self.wander_phase += TAU * self.motion.wander_freq * dt;
        self.heading + self.wander_phase.sin() * self.motion.wander_amp
    }

    /// Cruising speed used when no state overrides it.
    pub fn cruise_speed(&self) -> f64 {
        self.motion.base_speed * (0.35 + 0.2 * self.genome.traits.e)
    }

    /// Turns toward the desired heading, eases velocity toward the desired
    /// speed, applies drag, integrates position and pays the movement cost.
    pub fn move_step(&mut self, dt: f64, steering: Steering) {
        let max_turn = self.motion.max_turn_rate * dt;
        let turn = clamp(wrap_angle(steering.dir - self.heading), -max_turn, max_turn);
        self.heading += turn;

        let ease = 1.0 - (-dt * 3.0).exp();
        self.vx += (self.heading.cos() * steering.speed - self.vx) * ease;
        self.vy += (self.heading.sin() * steering.speed - self.vy) * ease;

        let damping = 1.0 - clamp(self.motion.drag * dt * 0.2, 0.0, 0.2);
        self.vx *= damping;
        self.vy *= damping;
        self.x += self.vx * dt;
        self.y += self.vy * dt;

        let speed = self.vx.hypot(self.vy);
        let cost = dt * (0.10 + 0.0009 * speed) * (0.7 + 0.6 * self.genome.metabolism);
        self.energy = (self.energy - cost).max(0.0);
    }

    /// Keeps the agent inside the arena, bouncing with damping and realigning
    /// the heading with the rebound.
    pub fn handle_bounds(&mut self, width: f64, height: f64) {
        let m = (self.size() * 0.8).max(8.0);
        if self.x < m {
            self.x = m;
            self.vx = self.vx.abs() * 0.6;
        }
        if self.x > width - m {
            self.x = width - m;
            self.vx = -self.vx.abs() * 0.6;
        }
        if self.y < m {
            self.y = m;
            self.vy = self.vy.abs() * 0.6;
        }
        if self.y > height - m {
            self.y = height - m;
            self.vy = -self.vy.abs() * 0.6;
        }

        let at_wall = self.x <= m || self.x >= width - m || self.y <= m || self.y >= height - m;
        if at_wall && self.vx.abs() + self.vy.abs() > 0.01 {
            self.heading = self.vy.atan2(self.vx);
        }
    }

    /// Enters `state` and restarts the state timer.
    pub fn enter(&mut self, state: BehaviorState) {
        self.state = state;
        self.state_timer = 0.0;
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            name: self.name(),
            x: self.x,
            y: self.y,
            heading: self.heading,
            hue: self.hue(),
            energy_ratio: self.energy_ratio(),
            state: self.state,
            is_adult: self.is_adult(),
            age: self.age,
            generation: self.generation,
            genome: self.genome.clone(),
            parent_ids: self
                .parents
                .map(|(a, b)| vec![a, b])
                .unwrap_or_default(),
        }
    }
}
