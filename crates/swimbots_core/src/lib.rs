//! # Swimbots Core
//!
//! The simulation engine for Swimbots, an agent-based artificial life
//! simulation of small swimming creatures that forage, court and breed.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Genomes with OCEAN personality traits, crossover and mutation
//! - The per-agent behavior state machine and inertial steering model
//! - Drifting food pellets
//! - Uniform-grid spatial indexing for proximity queries
//! - Population control and the per-tick world pipeline
//! - Configuration, metrics and structured logging
//!
//! ## Architecture
//!
//! The world owns agents and food in dense vectors and references them by id.
//! Removal and birth are deferred to the end of each tick, so slot indices
//! stay valid for the whole agent loop. All randomness flows from one seeded
//! RNG owned by the world.
//!
//! ## Example
//!
//! ```
//! use swimbots_core::config::WorldConfig;
//! use swimbots_core::World;
//!
//! let mut world = World::new(WorldConfig {
//!     seed: Some(42),
//!     ..Default::default()
//! })
//! .unwrap();
//! world.reset();
//! for _ in 0..60 {
//!     world.step(1.0 / 60.0, 1920.0, 1080.0, 1.0);
//! }
//! assert!(world.stats().total > 0);
//! ```

/// Agent state, phenotype and motion integration
pub mod agent;
/// Configuration management for simulation parameters
pub mod config;
/// Error types and the crate `Result` alias
pub mod error;
/// Drifting food pellets
pub mod food;
/// Genome construction and crossover
pub mod genome;
/// Scalar math helpers
pub mod math;
/// Performance metrics collection and logging
pub mod metrics;
/// Spatial hashing for proximity queries
pub mod spatial_hash;
/// World ownership, queries and the tick pipeline
pub mod world;

pub use agent::{Agent, MotionParams, Steering};
pub use error::{Result, SimError};
pub use food::Food;
pub use genome::GenomeLogic;
pub use metrics::{init_logging, Metrics};
pub use spatial_hash::SpatialHash;
pub use world::{Birth, World};
