//! Drifting energy pellets.

use crate::math::rand_range;
use rand::Rng;
use swimbots_data::{FoodId, FoodSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    pub id: FoodId,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub energy: f64,
    pub vx: f64,
    pub vy: f64,
    /// Set when consumed mid-tick; the world drops eaten pellets once the
    /// agent loop finishes.
    pub eaten: bool,
}

impl Food {
    pub fn new_with_rng<R: Rng>(id: FoodId, x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            id,
            x,
            y,
            r: rand_range(rng, 1.2, 2.5),
            energy: rand_range(rng, 12.0, 24.0),
            vx: rand_range(rng, -0.2, 0.2),
            vy: rand_range(rng, -0.2, 0.2),
            eaten: false,
        }
    }

    /// Advances one tick. Drift is per tick, not per second, and reflects off
    /// the arena walls inset by the pellet radius.
    pub fn step(&mut self, width: f64, height: f64) {
        self.x += self.vx;
        self.y += self.vy;

        let r = self.r;
        if self.x < r {
            self.x = r;
            self.vx = self.vx.abs();
        }
        if self.x > width - r {
            self.x = width - r;
            self.vx = -self.vx.abs();
        }
        if self.y < r {
            self.y = r;
            self.vy = self.vy.abs();
        }
        if self.y > height - r {
            self.y = height - r;
            self.vy = -self.vy.abs();
        }
    }

    pub fn snapshot(&self) -> FoodSnapshot {
        FoodSnapshot {
            id: self.id,
            x: self.x,
            y: self.y,
            r: self.r,
        }
    }
}
