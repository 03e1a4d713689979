//! Ball state and the fixed-step integrator.

use crate::config::{GRAVITY, MAX_SPEED};
use crate::vec2::{Pos2, Vec2};

/// A single ball, expressed in its owning chamber's local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Ball {
    pub pos: Pos2,
    pub r: f32,
    pub velocity: Vec2,
}

impl Ball {
    pub fn new(pos: Pos2, r: f32, velocity: Vec2) -> Self {
        Self { pos, r, velocity }
    }

    /// Advance the ball by one tick: gravity, then the speed clamp, then
    /// the Euler position update.
    pub fn integrate(&mut self, dt: f32) {
        self.velocity.y += GRAVITY * dt;

        let speed_squared = self.velocity.length_squared();
        if speed_squared > MAX_SPEED * MAX_SPEED {
            self.velocity = self.velocity * (MAX_SPEED / speed_squared.sqrt());
        }

        self.pos += self.velocity * dt;
    }

    /// True when both position and velocity are finite.
    pub fn is_finite(&self) -> bool {
        self.pos.x.is_finite()
            && self.pos.y.is_finite()
            && self.velocity.x.is_finite()
            && self.velocity.y.is_finite()
    }
}
