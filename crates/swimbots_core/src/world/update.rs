use super::World;
use crate::agent::Agent;
use crate::genome::GenomeLogic;
use crate::math::rand_range;
use rand::Rng;
use swimbots_data::AgentId;

/// Jitter applied to each axis of a newborn's position around the parents'
/// midpoint.
const CHILD_SCATTER: f64 = 12.0;

impl World {
    /// Advances the world by `dt` seconds inside a `width` x `height` arena.
    ///
    /// Pipeline: extinction reseed, food spawn, food drift, index rebuild,
    /// one evaluation per agent in collection order, then removal of the dead
    /// and eaten and insertion of newborns. Agents born during the loop are
    /// first evaluated on the next call. A paused world, or a non-finite or
    /// negative `dt`, leaves the world untouched.
    pub fn step(&mut self, dt: f64, width: f64, height: f64, food_rate: f64) {
        if !self.running {
            return;
        }
        if !dt.is_finite() || dt < 0.0 {
            tracing::warn!(dt, "Ignoring step with invalid time delta");
            return;
        }

        self.time += dt;
        self.tick += 1;
        self.width = width;
        self.height = height;

        if self.agents.is_empty() && !self.did_reseed {
            self.did_reseed = true;
            self.seed(self.config.reseed_count);
            tracing::info!(
                tick = self.tick,
                agents = self.agents.len(),
                "Population extinct, reseeding"
            );
        }

        let rate = self.config.food_spawn_base * food_rate.max(0.0);
        if self.rng.gen::<f64>() < rate * dt {
            let x = rand_range(&mut self.rng, 0.0, width);
            let y = rand_range(&mut self.rng, 0.0, height);
            self.push_food(x, y);
        }

        for food in &mut self.food {
            food.step(width, height);
        }

        self.reindex();

        for i in 0..self.agents.len() {
            self.step_agent(i, dt);
        }

        self.finalize();
    }

    /// Ages the agent, checks for death, runs one state transition and one
    /// motion step.
    fn step_agent(&mut self, i: usize, dt: f64) {
        let agent = &mut self.agents[i];
        if !agent.alive {
            return;
        }
        agent.age += dt;
        agent.state_timer += dt;
        agent.mate_cooldown = (agent.mate_cooldown - dt).max(0.0);

        if agent.age > agent.max_age || agent.energy <= 0.0 {
            agent.alive = false;
            return;
        }

        let wander_dir = agent.advance_wander(dt);
        let steering = self.run_behavior(i, wander_dir);

        let (width, height) = (self.width, self.height);
        let agent = &mut self.agents[i];
        agent.move_step(dt, steering);
        agent.handle_bounds(width, height);
    }

    /// Queues a child of slots `i` and `j` if both are adult, the population
    /// gate is open and both still have mating energy.
    pub(super) fn spawn_child(&mut self, i: usize, j: usize) -> Option<AgentId> {
        if !self.agents[i].is_adult() || !self.agents[j].is_adult() {
            return None;
        }
        if !self.should_allow_birth() {
            tracing::debug!("Birth suppressed by population gate");
            return None;
        }
        let (a, b) = (&self.agents[i], &self.agents[j]);
        if !a.has_mating_energy() || !b.has_mating_energy() {
            return None;
        }

        let genome = a
            .genome
            .crossover_with_rng(&b.genome, self.config.mutation_rate, &mut self.rng);
        let cx = (a.x + b.x) / 2.0 + rand_range(&mut self.rng, -CHILD_SCATTER, CHILD_SCATTER);
        let cy = (a.y + b.y) / 2.0 + rand_range(&mut self.rng, -CHILD_SCATTER, CHILD_SCATTER);
        let child = Agent::new_child_with_rng(cx, cy, genome, a, b, &mut self.rng);
        let id = child.id;
        tracing::debug!(
            child = %id,
            generation = child.generation,
            tick = self.tick,
            "Agent born"
        );
        self.pending_births.push(child);
        Some(id)
    }

    /// Applies the removals and insertions deferred during the agent loop.
    fn finalize(&mut self) {
        let before = self.agents.len();
        self.agents.retain(|a| a.alive && a.energy > 0.0);
        let died = before - self.agents.len();
        if died > 0 {
            tracing::debug!(died, tick = self.tick, "Agents removed");
        }

        self.food.retain(|f| !f.eaten);
        self.agents.append(&mut self.pending_births);
        self.reindex();

        if let Some(id) = self.selected {
            if self.agent_slot(id).is_none() {
                self.selected = None;
            }
        }
    }
}
