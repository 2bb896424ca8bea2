use super::World;
use crate::agent::Agent;
use crate::food::Food;
use crate::math::{clamp, dist2, hue_diff};
use rand::Rng;
use swimbots_data::AgentId;

/// Radius within which agents look for partners.
pub const MATE_SEARCH_RADIUS: f64 = 360.0;
/// Search radius for point selection.
const PICK_RADIUS: f64 = 28.0;
/// Maximum pick distance regardless of agent size.
const PICK_MAX_DIST: f64 = 20.0;

impl World {
    pub(crate) fn nearest_food_slot(&self, x: f64, y: f64, radius: f64) -> Option<usize> {
        let mut best = None;
        let mut best_d = radius * radius;
        self.food_index.query_callback(x, y, radius, |i| {
            let Some(f) = self.food.get(i).filter(|f| !f.eaten) else {
                return;
            };
            let d = dist2(x, y, f.x, f.y);
            if d < best_d {
                best = Some(i);
                best_d = d;
            }
        });
        best
    }

    /// Nearest uneaten pellet strictly within `radius` of `(x, y)`.
    pub fn find_nearest_food(&self, x: f64, y: f64, radius: f64) -> Option<&Food> {
        self.nearest_food_slot(x, y, radius).map(|i| &self.food[i])
    }

    /// Whether `candidate` would accept courtship from `seeker`.
    fn is_eligible_mate(seeker: &Agent, candidate: &Agent) -> bool {
        candidate.alive
            && candidate.id != seeker.id
            && candidate.is_adult()
            && candidate.mate_cooldown <= 0.0
            && hue_diff(seeker.hue(), candidate.hue())
                <= seeker.genome.pref_tol.min(candidate.genome.pref_tol)
            && candidate.state.is_courtable()
    }

    pub(crate) fn mate_slot_for(&self, seeker: usize) -> Option<usize> {
        let me = self.agents.get(seeker)?;
        let mut best = None;
        let mut best_d = MATE_SEARCH_RADIUS * MATE_SEARCH_RADIUS;
        self.agent_index
            .query_callback(me.x, me.y, MATE_SEARCH_RADIUS, |i| {
                if i == seeker {
                    return;
                }
                let Some(b) = self.agents.get(i) else {
                    return;
                };
                if !Self::is_eligible_mate(me, b) {
                    return;
                }
                let d = dist2(me.x, me.y, b.x, b.y);
                if d < best_d {
                    best = Some(i);
                    best_d = d;
                }
            });
        best
    }

    /// Nearest eligible partner for agent `id`: adult, off cooldown,
    /// hue-compatible under both tolerances and in a courtable state.
    pub fn find_mate(&self, id: AgentId) -> Option<&Agent> {
        let slot = self.agent_slot(id)?;
        self.mate_slot_for(slot).map(|i| &self.agents[i])
    }

    /// Selects the nearest agent whose visual radius covers `(x, y)`.
    /// Replaces the current selection, clearing it on a miss.
    pub fn pick_at(&mut self, x: f64, y: f64) -> Option<&Agent> {
        let mut best = None;
        let mut best_d = PICK_MAX_DIST * PICK_MAX_DIST;
        self.agent_index.query_callback(x, y, PICK_RADIUS, |i| {
            let Some(b) = self.agents.get(i).filter(|b| b.alive) else {
                return;
            };
            let d = dist2(x, y, b.x, b.y);
            let r = (b.size() * 1.2).max(14.0);
            if d < best_d.min(r * r) {
                best = Some(i);
                best_d = d;
            }
        });
        self.selected = best.map(|i| self.agents[i].id);
        best.map(|i| &self.agents[i])
    }

    /// Population gate evaluated at every birth attempt. Always open at or
    /// below the target, always closed at or above the cap, and linearly
    /// less likely in between.
    pub fn should_allow_birth(&mut self) -> bool {
        let n = self.population();
        let (target, cap) = (self.config.pop_target, self.config.pop_hard_cap);
        if n >= cap {
            return false;
        }
        if n <= target {
            return true;
        }
        let p = (cap - n) as f64 / (cap - target) as f64;
        self.rng.gen::<f64>() < clamp(p, 0.0, 1.0)
    }
}
