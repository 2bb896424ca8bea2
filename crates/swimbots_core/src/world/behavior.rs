//! Per-state transition functions of the agent state machine.
//!
//! Each function runs for one agent slot, may change that agent's state (and
//! its partner's, for mating), and returns the steering command for the
//! motion step. Stored targets and partners are looked up by id every tick,
//! so a removed entity reads as "no reference".

use super::World;
use crate::agent::Steering;
use crate::math::{dist2, hue_diff};
use rand::Rng;
use swimbots_data::{BehaviorState, FoodId};

/// Distance below which a pellet is eaten.
pub const EAT_RADIUS: f64 = 18.0;
/// Distance below which a chasing pair starts mating.
pub const MATE_RADIUS: f64 = 36.0;
/// Radius around a pellet checked for rivals chasing it.
pub const CONTEST_RADIUS: f64 = 48.0;
/// Seconds a pair stays in `Mating` before the birth resolves.
pub const MATING_DURATION: f64 = 1.2;
/// Refractory period applied to both parents after mating.
pub const MATE_COOLDOWN: f64 = 12.0;
/// Energy multiplier applied to both parents after mating.
pub const MATING_ENERGY_FACTOR: f64 = 0.6;

impl World {
    pub(super) fn run_behavior(&mut self, i: usize, wander_dir: f64) -> Steering {
        let agent = &self.agents[i];
        let default = Steering {
            dir: wander_dir,
            speed: agent.cruise_speed(),
        };
        match agent.state {
            BehaviorState::SeekFood => self.seek_food(i, default),
            BehaviorState::ChaseFood => self.chase_food(i, default),
            BehaviorState::JustAte => self.just_ate(i, default),
            BehaviorState::SeekMate => self.seek_mate(i, default),
            BehaviorState::ChaseMate => self.chase_mate(i, default),
            BehaviorState::Mating => self.mating(i, default),
        }
    }

    fn seek_food(&mut self, i: usize, default: Steering) -> Steering {
        let a = &self.agents[i];
        if a.is_adult() && a.energy > a.satiety().max(a.energy_max * 0.75) {
            self.agents[i].enter(BehaviorState::SeekMate);
            return default;
        }

        let target = match a.target.filter(|&id| self.food_slot(id).is_some()) {
            Some(id) => Some(id),
            None => self
                .nearest_food_slot(a.x, a.y, a.food_search_radius())
                .map(|slot| self.food[slot].id),
        };
        let speed = a.motion.base_speed * (0.55 + 0.25 * a.genome.traits.e);

        let a = &mut self.agents[i];
        a.target = target;
        if target.is_some() {
            a.state = BehaviorState::ChaseFood;
            return self.chase_food(i, default);
        }
        Steering {
            dir: default.dir,
            speed,
        }
    }

    /// Rivals chasing the same pellet that are strictly closer to it.
    fn closer_rivals(&self, i: usize, target: FoodId, tx: f64, ty: f64, d2: f64) -> usize {
        let mut rivals = 0;
        self.agent_index
            .query_callback(tx, ty, CONTEST_RADIUS, |j| {
                if j == i {
                    return;
                }
                let Some(o) = self.agents.get(j) else {
                    return;
                };
                if o.alive
                    && o.state == BehaviorState::ChaseFood
                    && o.target == Some(target)
                    && dist2(o.x, o.y, tx, ty) < d2 * 0.85
                {
                    rivals += 1;
                }
            });
        rivals
    }

    fn chase_food(&mut self, i: usize, default: Steering) -> Steering {
        let Some(slot) = self.agents[i].target.and_then(|id| self.food_slot(id)) else {
            let a = &mut self.agents[i];
            a.target = None;
            a.state = BehaviorState::SeekFood;
            return default;
        };

        let a = &self.agents[i];
        let (tx, ty, target) = (self.food[slot].x, self.food[slot].y, self.food[slot].id);
        let d2 = dist2(a.x, a.y, tx, ty);
        let d = d2.sqrt();
        let slow = if d < 60.0 { 0.7 } else { 1.0 };
        let slow2 = if d < 28.0 { 0.5 } else { 1.0 };
        let steering = Steering {
            dir: (ty - a.y).atan2(tx - a.x),
            speed: a.motion.base_speed * (0.85 + 0.25 * a.genome.traits.e) * slow * slow2,
        };

        // One concession roll per closer rival.
        let rivals = self.closer_rivals(i, target, tx, ty, d2);
        if rivals > 0 {
            let p = a.contest_yield();
            if (0..rivals).any(|_| self.rng.gen::<f64>() < p) {
                let a = &mut self.agents[i];
                a.target = None;
                a.state = BehaviorState::SeekFood;
                return Steering {
                    dir: default.dir,
                    speed: steering.speed,
                };
            }
        }

        if d2 < EAT_RADIUS * EAT_RADIUS {
            let food = &mut self.food[slot];
            food.eaten = true;
            let gained = food.energy;
            let a = &mut self.agents[i];
            a.energy = (a.energy + gained).min(a.energy_max);
            a.target = None;
            a.enter(BehaviorState::JustAte);
        }
        steering
    }

    fn just_ate(&mut self, i: usize, default: Steering) -> Steering {
        let a = &self.agents[i];
        let steering = Steering {
            dir: default.dir,
            speed: a.motion.base_speed * 0.35,
        };
        let hungry = a.energy < a.satiety();
        let greed = a.greed();
        let rested = a.is_adult() && a.state_timer > 1.5 * (1.2 - a.genome.traits.e);

        if hungry || self.rng.gen::<f64>() < greed {
            self.agents[i].state = BehaviorState::SeekFood;
        } else if rested {
            self.agents[i].enter(BehaviorState::SeekMate);
        }
        steering
    }

    fn seek_mate(&mut self, i: usize, default: Steering) -> Steering {
        let a = &self.agents[i];
        if !a.is_adult() || a.mate_cooldown > 0.0 || !a.has_mating_energy() {
            self.agents[i].state = BehaviorState::SeekFood;
            return default;
        }

        let partner = match a.partner.filter(|&id| self.agent_slot(id).is_some()) {
            Some(id) => Some(id),
            None => self.mate_slot_for(i).map(|slot| self.agents[slot].id),
        };
        if partner.is_some() {
            let a = &mut self.agents[i];
            a.partner = partner;
            a.state = BehaviorState::ChaseMate;
            return default;
        }

        let speed = a.motion.base_speed * (0.55 + 0.25 * a.genome.traits.e);
        let bias = a.explore_bias();
        self.agents[i].partner = None;
        let jitter = (self.rng.gen::<f64>() - 0.5) * bias;
        Steering {
            dir: default.dir + jitter,
            speed,
        }
    }

    fn chase_mate(&mut self, i: usize, default: Steering) -> Steering {
        let partner = self.agents[i]
            .partner
            .and_then(|id| self.agent_slot(id))
            .filter(|&j| j != i && self.agents[j].is_adult());
        let Some(j) = partner else {
            let a = &mut self.agents[i];
            a.partner = None;
            a.state = BehaviorState::SeekMate;
            return default;
        };

        let (a, b) = (&self.agents[i], &self.agents[j]);
        let steering = Steering {
            dir: (b.y - a.y).atan2(b.x - a.x),
            speed: a.motion.base_speed * (0.9 + 0.3 * a.genome.traits.e),
        };
        if dist2(a.x, a.y, b.x, b.y) >= MATE_RADIUS * MATE_RADIUS {
            return steering;
        }

        let compatible = hue_diff(a.hue(), b.hue()) <= a.genome.pref_tol.min(b.genome.pref_tol);
        if compatible && b.mate_cooldown <= 0.0 {
            let (id_a, id_b) = (a.id, b.id);
            let a = &mut self.agents[i];
            a.partner = Some(id_b);
            a.enter(BehaviorState::Mating);
            let b = &mut self.agents[j];
            b.partner = Some(id_a);
            b.enter(BehaviorState::Mating);
            tracing::trace!(a = %id_a, b = %id_b, "Pair started mating");
        } else {
            let a = &mut self.agents[i];
            a.partner = None;
            a.state = BehaviorState::SeekMate;
        }
        steering
    }

    /// Only the member of the pair with the smaller id resolves the birth;
    /// the other holds until it is released or its pairing goes stale.
    fn mating(&mut self, i: usize, default: Steering) -> Steering {
        let a = &self.agents[i];
        let steering = Steering {
            dir: default.dir,
            speed: a.motion.base_speed * 0.2,
        };
        if a.state_timer <= MATING_DURATION {
            return steering;
        }

        let paired = a.partner.and_then(|id| self.agent_slot(id)).filter(|&j| {
            let b = &self.agents[j];
            j != i && b.state == BehaviorState::Mating && b.partner == Some(a.id)
        });
        match paired {
            None => {
                let a = &mut self.agents[i];
                a.partner = None;
                a.enter(BehaviorState::SeekFood);
            }
            Some(j) if a.id < self.agents[j].id => self.resolve_mating(i, j),
            Some(_) => {}
        }
        steering
    }

    fn resolve_mating(&mut self, i: usize, j: usize) {
        self.spawn_child(i, j);
        for k in [i, j] {
            let a = &mut self.agents[k];
            a.mate_cooldown = MATE_COOLDOWN;
            a.energy *= MATING_ENERGY_FACTOR;
            a.partner = None;
            a.enter(BehaviorState::SeekFood);
        }
    }
}
