use super::agent::AgentId;
use super::genome::OceanTraits;
use serde::{Deserialize, Serialize};

/// Aggregate population figures for dashboards and periodic logging.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PopulationStats {
    pub total: usize,
    pub adults: usize,
    pub children: usize,
    pub food: usize,
    pub max_generation: u32,
    pub avg_traits: Option<OceanTraits>,
    pub time: f64,
}

/// Discrete events derived by the host from consecutive world states.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// An agent was born from two parents.
    Birth {
        id: AgentId,
        parent_ids: Vec<AgentId>,
        generation: u32,
        tick: u64,
        timestamp: String,
    },
    /// An agent left the world between two ticks.
    Death {
        id: AgentId,
        tick: u64,
        timestamp: String,
    },
}
