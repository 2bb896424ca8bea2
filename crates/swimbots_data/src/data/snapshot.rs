use super::agent::{AgentId, BehaviorState, FoodId};
use super::events::PopulationStats;
use super::genome::Genome;
use serde::{Deserialize, Serialize};

/// Read-only view of one agent, suitable for broadcasting to observers.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub hue: f64,
    pub energy_ratio: f64,
    pub state: BehaviorState,
    pub is_adult: bool,
    pub age: f64,
    pub generation: u32,
    pub genome: Genome,
    pub parent_ids: Vec<AgentId>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct FoodSnapshot {
    pub id: FoodId,
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WorldSnapshot {
    pub time: f64,
    pub width: f64,
    pub height: f64,
    pub agents: Vec<AgentSnapshot>,
    pub food: Vec<FoodSnapshot>,
    pub stats: PopulationStats,
}

impl WorldSnapshot {
    /// Caps the number of agents and pellets, keeping the first entries.
    pub fn truncated(mut self, max_agents: usize, max_food: usize) -> Self {
        self.agents.truncate(max_agents);
        self.food.truncate(max_food);
        self
    }
}
