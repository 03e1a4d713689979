//! Stock chamber programs.
//!
//! These run in-process and double as reference implementations for chamber
//! authors: they only use the public collision kernel and the `Chamber`
//! contract. Production deployments load user-supplied programs through the
//! sandbox host instead.

use crate::ball::Ball;
use crate::chamber::{Chamber, ChamberError};
use crate::collision::{apply_surface_collision, surface_collision_resolution};
use crate::vec2::{Pos2, Surface};

/// A chamber with a single flat floor that balls bounce off.
pub struct SimpleChamber {
    floor: Surface,
}

/// Height of the simple chamber's floor.
pub const SIMPLE_FLOOR_Y: f32 = 0.05;

impl SimpleChamber {
    pub fn new() -> Self {
        Self {
            floor: Surface::new(
                Pos2::new(0.0, SIMPLE_FLOOR_Y),
                Pos2::new(1.0, SIMPLE_FLOOR_Y),
            ),
        }
    }
}

impl Default for SimpleChamber {
    fn default() -> Self {
        Self::new()
    }
}

impl Chamber for SimpleChamber {
    fn init(&mut self, _num_balls: u32) {}

    fn step(&mut self, balls: &mut [Ball], dt: f32) -> Result<(), ChamberError> {
        for ball in balls.iter_mut() {
            let travel = ball.velocity * dt;
            if let Some(resolution) = surface_collision_resolution(&self.floor, ball.pos, travel) {
                apply_surface_collision(ball, resolution, self.floor.normal(), dt);
            }
        }
        Ok(())
    }
}

/// A chamber with three staggered platforms that deflect falling balls.
pub struct PlatformsChamber {
    platforms: [Surface; 3],
}

impl PlatformsChamber {
    pub fn new() -> Self {
        Self {
            platforms: [
                Surface::new(Pos2::new(0.05, 0.5), Pos2::new(0.4, 0.45)),
                Surface::new(Pos2::new(0.6, 0.35), Pos2::new(0.95, 0.3)),
                Surface::new(Pos2::new(0.3, 0.12), Pos2::new(0.7, 0.12)),
            ],
        }
    }
}

impl Default for PlatformsChamber {
    fn default() -> Self {
        Self::new()
    }
}

impl Chamber for PlatformsChamber {
    fn init(&mut self, _num_balls: u32) {}

    fn step(&mut self, balls: &mut [Ball], dt: f32) -> Result<(), ChamberError> {
        for ball in balls.iter_mut() {
            let travel = ball.velocity * dt;
            for platform in &self.platforms {
                if let Some(resolution) = surface_collision_resolution(platform, ball.pos, travel)
                {
                    apply_surface_collision(ball, resolution, platform.normal(), dt);
                    // One platform per tick; the resolved position is
                    // re-checked against the others next tick.
                    break;
                }
            }
        }
        Ok(())
    }
}
