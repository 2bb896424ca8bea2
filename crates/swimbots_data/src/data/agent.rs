use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of an agent. Totally ordered, which the mating
/// tie-break relies on.
pub type AgentId = Uuid;

/// Identifier of a food pellet, unique within one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FoodId(pub u64);

/// Behavior state of an agent's finite state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorState {
    /// Looking for the nearest pellet in sensing range.
    #[default]
    SeekFood,
    /// Steering toward an adopted pellet.
    ChaseFood,
    /// Short recovery after eating.
    JustAte,
    /// Looking for a compatible partner.
    SeekMate,
    /// Steering toward an adopted partner.
    ChaseMate,
    /// Paired with a partner, nearly stationary.
    Mating,
}

impl BehaviorState {
    pub const ALL: [BehaviorState; 6] = [
        BehaviorState::SeekFood,
        BehaviorState::ChaseFood,
        BehaviorState::JustAte,
        BehaviorState::SeekMate,
        BehaviorState::ChaseMate,
        BehaviorState::Mating,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorState::SeekFood => "seek_food",
            BehaviorState::ChaseFood => "chase_food",
            BehaviorState::JustAte => "just_ate",
            BehaviorState::SeekMate => "seek_mate",
            BehaviorState::ChaseMate => "chase_mate",
            BehaviorState::Mating => "mating",
        }
    }

    /// States in which an agent can be courted by another.
    pub fn is_courtable(self) -> bool {
        matches!(
            self,
            BehaviorState::SeekMate | BehaviorState::JustAte | BehaviorState::SeekFood
        )
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
