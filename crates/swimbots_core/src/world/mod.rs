//! The simulation world: entity ownership, spawning and removal.
//!
//! Agents and food live in dense vectors. During a tick slots never move:
//! dead agents are tombstoned (`alive == false`), eaten pellets are flagged
//! (`eaten == true`) and newborns wait in a pending list. All three are
//! applied after the agent loop, then the spatial indices are rebuilt so
//! that queries between ticks see a consistent world.

mod behavior;
mod query;
mod update;

use crate::agent::Agent;
use crate::config::WorldConfig;
use crate::error::Result;
use crate::food::Food;
use crate::genome::GenomeLogic;
use crate::math::rand_range;
use crate::spatial_hash::SpatialHash;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};
use swimbots_data::{
    AgentId, FoodId, Genome, OceanTraits, PopulationStats, WorldSnapshot,
};

/// A freshly born agent, reported once through [`World::take_newborns`].
#[derive(Debug, Clone, PartialEq)]
pub struct Birth {
    pub id: AgentId,
    pub parents: Option<(AgentId, AgentId)>,
    pub generation: u32,
}

pub struct World {
    agents: Vec<Agent>,
    food: Vec<Food>,
    pub time: f64,
    pub tick: u64,
    /// Arena supplied by the host on each step.
    pub width: f64,
    pub height: f64,
    pub selected: Option<AgentId>,
    config: WorldConfig,
    running: bool,
    agent_index: SpatialHash,
    food_index: SpatialHash,
    agent_slots: HashMap<AgentId, usize>,
    food_slots: HashMap<FoodId, usize>,
    pending_births: Vec<Agent>,
    did_reseed: bool,
    next_food_id: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates an empty, running world. Fails if the configuration is
    /// invalid. Seeds the RNG from `config.seed` when present.
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            agents: Vec::new(),
            food: Vec::new(),
            time: 0.0,
            tick: 0,
            width: config.arena_width,
            height: config.arena_height,
            selected: None,
            agent_index: SpatialHash::new(config.agent_cell_size),
            food_index: SpatialHash::new(config.food_cell_size),
            agent_slots: HashMap::new(),
            food_slots: HashMap::new(),
            pending_births: Vec::new(),
            did_reseed: false,
            next_food_id: 0,
            running: true,
            config,
            rng,
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn food(&self) -> &[Food] {
        &self.food
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Pauses or resumes the world. A paused world ignores `step`.
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Whether the one-shot extinction reseed has already fired.
    pub fn did_reseed(&self) -> bool {
        self.did_reseed
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agent_slot(id).map(|i| &self.agents[i])
    }

    /// Mutable access for hosts and tests. Position edits are picked up by
    /// the next [`reindex`](Self::reindex), which every step performs.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agent_slot(id).map(move |i| &mut self.agents[i])
    }

    pub fn food_item(&self, id: FoodId) -> Option<&Food> {
        self.food_slot(id).map(|i| &self.food[i])
    }

    pub fn food_mut(&mut self, id: FoodId) -> Option<&mut Food> {
        self.food_slot(id).map(move |i| &mut self.food[i])
    }

    pub fn agent_ids(&self) -> HashSet<AgentId> {
        self.agents.iter().filter(|a| a.alive).map(|a| a.id).collect()
    }

    /// Live agents plus births queued in the current tick.
    pub fn population(&self) -> usize {
        self.agents.iter().filter(|a| a.alive).count() + self.pending_births.len()
    }

    /// Slot of a live agent. Tombstoned agents resolve to `None`, so stale
    /// references behave like missing ones.
    pub(crate) fn agent_slot(&self, id: AgentId) -> Option<usize> {
        self.agent_slots
            .get(&id)
            .copied()
            .filter(|&i| self.agents.get(i).is_some_and(|a| a.alive && a.id == id))
    }

    pub(crate) fn food_slot(&self, id: FoodId) -> Option<usize> {
        self.food_slots
            .get(&id)
            .copied()
            .filter(|&i| self.food.get(i).is_some_and(|f| !f.eaten && f.id == id))
    }

    /// Rebuilds both spatial indices and the id lookup tables from the
    /// current collections.
    pub fn reindex(&mut self) {
        self.agent_index.rebuild(&self.agents, |a| (a.x, a.y));
        self.food_index.rebuild(&self.food, |f| (f.x, f.y));
        self.agent_slots.clear();
        self.agent_slots
            .extend(self.agents.iter().enumerate().map(|(i, a)| (a.id, i)));
        self.food_slots.clear();
        self.food_slots
            .extend(self.food.iter().enumerate().map(|(i, f)| (f.id, i)));
    }

    fn random_position(&mut self) -> (f64, f64) {
        let x = rand_range(&mut self.rng, 0.0, self.width);
        let y = rand_range(&mut self.rng, 0.0, self.height);
        (x, y)
    }

    fn push_agent(&mut self, x: f64, y: f64, genome: Genome) -> usize {
        let agent = Agent::new_with_rng(x, y, genome.normalized(), &mut self.rng);
        self.agents.push(agent);
        self.agents.len() - 1
    }

    /// Adds `n` random generation-zero agents at random positions.
    pub fn seed(&mut self, n: usize) {
        for _ in 0..n {
            let genome = Genome::new_seeded_with_rng(&mut self.rng);
            let (x, y) = self.random_position();
            self.push_agent(x, y, genome);
        }
        self.reindex();
    }

    /// Adds one random agent at a random position and returns it.
    pub fn spawn_random(&mut self) -> &Agent {
        let genome = Genome::new_seeded_with_rng(&mut self.rng);
        self.spawn_with_genome(genome)
    }

    /// Adds one agent with a caller-supplied genome at a random position.
    pub fn spawn_with_genome(&mut self, genome: Genome) -> &Agent {
        let (x, y) = self.random_position();
        let slot = self.push_agent(x, y, genome);
        self.reindex();
        &self.agents[slot]
    }

    /// Adds one agent carrying externally chosen personality traits.
    pub fn spawn_with_personality(&mut self, traits: OceanTraits) -> &Agent {
        let genome = Genome::with_personality_with_rng(traits, &mut self.rng);
        self.spawn_with_genome(genome)
    }

    /// Adds one agent at an exact position.
    pub fn spawn_at(&mut self, x: f64, y: f64, genome: Genome) -> AgentId {
        let slot = self.push_agent(x, y, genome);
        self.reindex();
        self.agents[slot].id
    }

    /// Adds a pellet at an exact position.
    pub fn spawn_food_at(&mut self, x: f64, y: f64) -> FoodId {
        let id = self.push_food(x, y);
        self.reindex();
        id
    }

    fn push_food(&mut self, x: f64, y: f64) -> FoodId {
        let id = FoodId(self.next_food_id);
        self.next_food_id += 1;
        self.food.push(Food::new_with_rng(id, x, y, &mut self.rng));
        id
    }

    /// Removes an agent by identity, clearing the selection if it pointed
    /// at it. Other agents holding the id as partner see it as stale.
    pub fn remove_agent(&mut self, id: AgentId) -> Option<Agent> {
        let pos = self.agents.iter().position(|a| a.id == id)?;
        let removed = self.agents.remove(pos);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.reindex();
        Some(removed)
    }

    pub fn remove_food(&mut self, id: FoodId) -> Option<Food> {
        let pos = self.food.iter().position(|f| f.id == id)?;
        let removed = self.food.remove(pos);
        self.reindex();
        Some(removed)
    }

    /// Removes every agent, leaving food untouched.
    pub fn clear_agents(&mut self) {
        self.agents.clear();
        self.pending_births.clear();
        self.selected = None;
        self.reindex();
    }

    /// Clears all entities and the selection, then seeds the initial
    /// population.
    pub fn reset(&mut self) {
        self.agents.clear();
        self.food.clear();
        self.pending_births.clear();
        self.selected = None;
        self.seed(self.config.initial_population);
        tracing::info!(agents = self.agents.len(), "World reset");
    }

    /// Drains the one-shot `just_born` flags.
    pub fn take_newborns(&mut self) -> Vec<Birth> {
        self.agents
            .iter_mut()
            .filter(|a| a.just_born)
            .map(|a| {
                a.just_born = false;
                Birth {
                    id: a.id,
                    parents: a.parents,
                    generation: a.generation,
                }
            })
            .collect()
    }

    pub fn stats(&self) -> PopulationStats {
        let live = || self.agents.iter().filter(|a| a.alive);
        let total = live().count();
        let adults = live().filter(|a| a.is_adult()).count();
        let avg_traits = (total > 0).then(|| {
            let mut sum = [0.0; 5];
            for a in live() {
                for (s, v) in sum.iter_mut().zip(a.genome.traits.as_array()) {
                    *s += v;
                }
            }
            let n = total as f64;
            OceanTraits::new(sum[0] / n, sum[1] / n, sum[2] / n, sum[3] / n, sum[4] / n)
        });
        PopulationStats {
            total,
            adults,
            children: total - adults,
            food: self.food.iter().filter(|f| !f.eaten).count(),
            max_generation: live().map(|a| a.generation).max().unwrap_or(0),
            avg_traits,
            time: self.time,
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            time: self.time,
            width: self.width,
            height: self.height,
            agents: self
                .agents
                .iter()
                .filter(|a| a.alive)
                .map(Agent::snapshot)
                .collect(),
            food: self
                .food
                .iter()
                .filter(|f| !f.eaten)
                .map(Food::snapshot)
                .collect(),
            stats: self.stats(),
        }
    }
}
