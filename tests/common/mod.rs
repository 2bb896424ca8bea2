pub mod macros;

use swimbots_core::config::WorldConfig;
use swimbots_core::World;
use swimbots_data::{AgentId, BehaviorState, Genome, OceanTraits};

pub const ARENA_W: f64 = 1920.0;
pub const ARENA_H: f64 = 1080.0;
pub const DT: f64 = 1.0 / 60.0;

/// Steps the world `n` times with no food spawning.
#[allow(dead_code)]
pub fn run_ticks(world: &mut World, n: usize) {
    for _ in 0..n {
        world.step(DT, ARENA_W, ARENA_H, 0.0);
    }
}

#[allow(dead_code)]
pub struct WorldBuilder {
    config: WorldConfig,
    agents: Vec<AgentBuilder>,
    food: Vec<(f64, f64, Option<f64>)>,
    random_agents: usize,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        Self {
            config: WorldConfig {
                seed: Some(42),
                ..Default::default()
            },
            agents: Vec::new(),
            food: Vec::new(),
            random_agents: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut WorldConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_agent(mut self, agent: AgentBuilder) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn with_random_agents(mut self, n: usize) -> Self {
        self.random_agents = n;
        self
    }

    /// Adds a motionless pellet, optionally with a fixed energy value.
    pub fn with_food(mut self, x: f64, y: f64, energy: Option<f64>) -> Self {
        self.food.push((x, y, energy));
        self
    }

    /// Builds the world. Returns the ids of the explicitly added agents in
    /// insertion order.
    pub fn build(self) -> (World, Vec<AgentId>) {
        let mut world = World::new(self.config).expect("Failed to create world in test builder");
        world.seed(self.random_agents);

        let ids = self
            .agents
            .into_iter()
            .map(|builder| builder.spawn(&mut world))
            .collect();

        for (x, y, energy) in self.food {
            let id = world.spawn_food_at(x, y);
            let food = world.food_mut(id).expect("food just spawned");
            food.vx = 0.0;
            food.vy = 0.0;
            if let Some(energy) = energy {
                food.energy = energy;
            }
        }
        world.reindex();
        (world, ids)
    }
}

#[allow(dead_code)]
pub struct AgentBuilder {
    x: f64,
    y: f64,
    hue: f64,
    body_size: f64,
    lifespan: f64,
    pref_tol: f64,
    traits: OceanTraits,
    age: f64,
    energy_fraction: Option<f64>,
    state: BehaviorState,
    mate_cooldown: f64,
}

#[allow(dead_code)]
impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            x: 500.0,
            y: 500.0,
            hue: 100.0,
            body_size: 10.0,
            lifespan: 300.0,
            pref_tol: 30.0,
            traits: OceanTraits::default(),
            age: 0.0,
            energy_fraction: None,
            state: BehaviorState::SeekFood,
            mate_cooldown: 0.0,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn hue(mut self, hue: f64) -> Self {
        self.hue = hue;
        self
    }

    pub fn pref_tol(mut self, tol: f64) -> Self {
        self.pref_tol = tol;
        self
    }

    pub fn traits(mut self, traits: OceanTraits) -> Self {
        self.traits = traits;
        self
    }

    pub fn lifespan(mut self, lifespan: f64) -> Self {
        self.lifespan = lifespan;
        self
    }

    /// Old enough to be adult for any body size.
    pub fn adult(mut self) -> Self {
        self.age = 30.0;
        self
    }

    pub fn age(mut self, age: f64) -> Self {
        self.age = age;
        self
    }

    /// Energy as a fraction of capacity.
    pub fn energy(mut self, fraction: f64) -> Self {
        self.energy_fraction = Some(fraction);
        self
    }

    pub fn state(mut self, state: BehaviorState) -> Self {
        self.state = state;
        self
    }

    pub fn cooldown(mut self, seconds: f64) -> Self {
        self.mate_cooldown = seconds;
        self
    }

    pub fn genome(&self) -> Genome {
        Genome::new(
            self.hue,
            self.body_size,
            0.7,
            self.lifespan,
            self.pref_tol,
            self.traits,
        )
    }

    fn spawn(self, world: &mut World) -> AgentId {
        let id = world.spawn_at(self.x, self.y, self.genome());
        let agent = world.agent_mut(id).expect("agent just spawned");
        agent.age = self.age;
        agent.state = self.state;
        agent.mate_cooldown = self.mate_cooldown;
        if let Some(fraction) = self.energy_fraction {
            agent.energy = agent.energy_max * fraction;
        }
        id
    }
}
