//! # Swimbots Data
//!
//! Plain, serializable data shared between the simulation core and its hosts:
//! genomes, behavior states, identifiers, read-only snapshots and live events.
//! Nothing in this crate draws randomness or advances time.

pub mod data;

pub use data::agent::{AgentId, BehaviorState, FoodId};
pub use data::events::{LiveEvent, PopulationStats};
pub use data::genome::{Genome, OceanTraits};
pub use data::snapshot::{AgentSnapshot, FoodSnapshot, WorldSnapshot};
