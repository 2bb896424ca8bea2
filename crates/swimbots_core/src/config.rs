//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration that maps onto a `config.toml` file. Every
//! field has a default, so a partial file only overrides what it names.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! pop_target = 50
//! pop_hard_cap = 90
//! mutation_rate = 0.07
//! seed = 42
//!
//! [host]
//! tick_rate_hz = 60
//! broadcast_interval_ms = 100
//! ```

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters owned by the world itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Population below which every birth is allowed.
    pub pop_target: usize,
    /// Population at which births stop entirely.
    pub pop_hard_cap: usize,
    /// Per-trait mutation probability applied during crossover.
    pub mutation_rate: f64,
    /// Expected pellets spawned per simulated second at food rate 1.0.
    pub food_spawn_base: f64,
    pub food_cell_size: f64,
    pub agent_cell_size: f64,
    /// Arena used until the host supplies one through `step`.
    pub arena_width: f64,
    pub arena_height: f64,
    pub initial_population: usize,
    /// Agents seeded once if the population ever reaches zero.
    pub reseed_count: usize,
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            pop_target: 50,
            pop_hard_cap: 90,
            mutation_rate: 0.07,
            food_spawn_base: 1.2,
            food_cell_size: 56.0,
            agent_cell_size: 80.0,
            arena_width: 1920.0,
            arena_height: 1080.0,
            initial_population: 32,
            reseed_count: 32,
            seed: None,
        }
    }
}

/// Pacing and broadcast parameters used by the headless host.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HostConfig {
    pub tick_rate_hz: u32,
    pub broadcast_interval_ms: u64,
    pub stats_interval_ticks: u64,
    pub food_rate: f64,
    pub max_broadcast_agents: usize,
    pub max_broadcast_food: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            broadcast_interval_ms: 100,
            stats_interval_ticks: 600,
            food_rate: 1.0,
            max_broadcast_agents: 200,
            max_broadcast_food: 100,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub host: HostConfig,
}

fn ensure(cond: bool, field: &'static str, reason: &str) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(SimError::invalid_config(field, reason))
    }
}

impl WorldConfig {
    /// Validates world parameters, returning the first violation found.
    pub fn validate(&self) -> Result<()> {
        ensure(self.pop_hard_cap > 0, "pop_hard_cap", "must be positive")?;
        ensure(
            self.pop_hard_cap >= self.pop_target,
            "pop_hard_cap",
            "must be greater than or equal to pop_target",
        )?;
        ensure(
            (0.0..=1.0).contains(&self.mutation_rate),
            "mutation_rate",
            "must be in [0.0, 1.0]",
        )?;
        ensure(
            self.food_spawn_base.is_finite() && self.food_spawn_base >= 0.0,
            "food_spawn_base",
            "must be a non-negative number",
        )?;
        ensure(
            self.food_cell_size.is_finite() && self.food_cell_size > 0.0,
            "food_cell_size",
            "must be a positive number",
        )?;
        ensure(
            self.agent_cell_size.is_finite() && self.agent_cell_size > 0.0,
            "agent_cell_size",
            "must be a positive number",
        )?;
        ensure(
            self.arena_width.is_finite() && self.arena_width > 0.0,
            "arena_width",
            "must be a positive number",
        )?;
        ensure(
            self.arena_height.is_finite() && self.arena_height > 0.0,
            "arena_height",
            "must be a positive number",
        )?;
        Ok(())
    }
}

impl AppConfig {
    /// Validates all configuration parameters.
    pub fn validate(&self) -> Result<()> {
        self.world.validate()?;
        ensure(self.host.tick_rate_hz > 0, "tick_rate_hz", "must be positive")?;
        ensure(
            self.host.tick_rate_hz <= 1000,
            "tick_rate_hz",
            "too high (max 1000)",
        )?;
        ensure(
            self.host.food_rate.is_finite() && self.host.food_rate >= 0.0,
            "food_rate",
            "must be a non-negative number",
        )?;
        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Stable digest of the world parameters, for attributing runs.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hex::encode(hasher.finalize())
    }
}
