//! The simulation core: ball ownership, wrap, per-chamber delegation, and
//! the fixed-step tick orchestrator.
//!
//! `Simulation` owns the ball array, the parallel owner array, and the
//! registered chamber programs. A tick is: integrate every ball, wrap
//! positions back into the unit cell while hopping owners across the torus,
//! then for each grid cell assemble the local view, let the cell's program
//! mutate it, run pairwise collisions, and write the result back. The tick
//! always completes: failing chamber programs degrade to no-ops and
//! non-finite ball states are repaired from the pre-tick snapshot.

use std::fmt;
use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ball::Ball;
use crate::chamber::Chamber;
use crate::collision;
use crate::config::{BALL_RADIUS, CHAMBER_HEIGHT, SimConfig, STEP_DT, STEP_LEN_NS};
use crate::layout::ChamberLayout;
use crate::protocol::{ball_to_wire, SimulationStateMsg};
use crate::vec2::{Pos2, Vec2};
use crate::view::{self, ViewSlot};

/// Error returned when a chamber cannot be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddChamberError {
    /// The deployment's chamber limit has been reached.
    AtCapacity { limit: usize },
}

impl fmt::Display for AddChamberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddChamberError::AtCapacity { limit } => {
                write!(f, "chamber limit of {} reached", limit)
            }
        }
    }
}

impl std::error::Error for AddChamberError {}

/// The ball machine simulation. Owned by the driver; cross-thread access
/// goes through a single exclusive lock held per `tick`/`add_chamber`.
pub struct Simulation {
    config: SimConfig,
    seed: u64,
    rng: ChaCha8Rng,
    balls: Vec<Ball>,
    owners: Vec<usize>,
    chambers: Vec<Box<dyn Chamber>>,
    layout: ChamberLayout,
    num_steps_taken: u64,
    // Per-tick buffers, reused to avoid allocation churn.
    view_balls: Vec<Ball>,
    view_meta: Vec<ViewSlot>,
    view_prev: Vec<Ball>,
    tick_start_balls: Vec<Ball>,
    tick_start_owners: Vec<usize>,
}

impl Simulation {
    /// Build a simulation with the default configuration. The ball layout
    /// is fully determined by `seed`.
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, SimConfig::default())
    }

    pub fn with_config(seed: u64, config: SimConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let balls: Vec<Ball> = (0..config.num_balls).map(|_| spawn_ball(&mut rng)).collect();
        let owners = vec![0; balls.len()];
        let layout = ChamberLayout::new(0, config.chambers_per_row);

        Self {
            config,
            seed,
            rng,
            balls,
            owners,
            chambers: Vec::new(),
            layout,
            num_steps_taken: 0,
            view_balls: Vec::new(),
            view_meta: Vec::new(),
            view_prev: Vec::new(),
            tick_start_balls: Vec::new(),
            tick_start_owners: Vec::new(),
        }
    }

    /// Register a chamber program. Calls its `init` once and re-derives the
    /// grid topology.
    pub fn add_chamber(&mut self, mut chamber: Box<dyn Chamber>) -> Result<(), AddChamberError> {
        if self.chambers.len() >= self.config.max_chambers {
            return Err(AddChamberError::AtCapacity {
                limit: self.config.max_chambers,
            });
        }

        chamber.init(self.balls.len() as u32);
        self.chambers.push(chamber);
        self.layout = ChamberLayout::new(self.chambers.len(), self.config.chambers_per_row);
        tracing::info!(
            "chamber {} registered, layout now has {} cells",
            self.chambers.len() - 1,
            self.layout.num_chambers()
        );
        Ok(())
    }

    /// Advance one fixed-length tick.
    pub fn tick(&mut self) {
        self.tick_start_balls.clear();
        self.tick_start_balls.extend_from_slice(&self.balls);
        self.tick_start_owners.clear();
        self.tick_start_owners.extend_from_slice(&self.owners);

        for ball in &mut self.balls {
            ball.integrate(STEP_DT);
        }
        self.apply_wrap();

        for cell in 0..self.layout.num_chambers() {
            self.assemble_view(cell);

            if cell < self.chambers.len() {
                self.view_prev.clear();
                self.view_prev.extend_from_slice(&self.view_balls);
                if let Err(err) = self.chambers[cell].step(&mut self.view_balls, STEP_DT) {
                    tracing::warn!("chamber {} step failed, treating as no-op: {}", cell, err);
                    self.view_balls.copy_from_slice(&self.view_prev);
                }
            }

            // Pairwise collisions over the local view, ascending (k, j);
            // each overlap is resolved before the next pair is tested.
            for k in 0..self.view_balls.len() {
                let (head, tail) = self.view_balls.split_at_mut(k + 1);
                let a = &mut head[k];
                for b in tail.iter_mut() {
                    collision::resolve_ball_collision(a, b);
                }
            }

            self.write_back();
        }

        self.num_steps_taken += 1;
    }

    /// Run ticks until the simulation has caught up with `elapsed` wall
    /// clock time since the simulation started. Returns the number of ticks
    /// run. Accumulated debt is always worked off; there is no frame
    /// dropping.
    pub fn step(&mut self, elapsed: Duration) -> u64 {
        let elapsed_ns = elapsed.as_nanos() as u64;
        let mut ticks_run = 0;
        while self.num_steps_taken * STEP_LEN_NS < elapsed_ns {
            self.tick();
            ticks_run += 1;
        }
        ticks_run
    }

    /// Respawn every ball from the stored PRNG stream. Owners return to
    /// cell 0. The tick counter is untouched so wall-clock pacing continues
    /// seamlessly.
    pub fn reset(&mut self) {
        for ball in &mut self.balls {
            *ball = spawn_ball(&mut self.rng);
        }
        for owner in &mut self.owners {
            *owner = 0;
        }
        tracing::info!("simulation reset, {} balls respawned", self.balls.len());
    }

    /// Change the ball population. Existing balls keep their state; the
    /// array grows or shrinks at the tail.
    pub fn set_num_balls(&mut self, num_balls: usize) {
        while self.balls.len() > num_balls {
            self.balls.pop();
            self.owners.pop();
        }
        while self.balls.len() < num_balls {
            self.balls.push(spawn_ball(&mut self.rng));
            self.owners.push(0);
        }
        self.config.num_balls = num_balls;
    }

    /// Change the grid width and re-derive the topology. Owners that fall
    /// outside a shrunken layout are folded back into range.
    pub fn set_chambers_per_row(&mut self, chambers_per_row: usize) -> Result<(), String> {
        if chambers_per_row == 0 {
            return Err("chambers_per_row must be > 0".to_string());
        }
        self.config.chambers_per_row = chambers_per_row;
        self.layout = ChamberLayout::new(self.chambers.len(), chambers_per_row);

        let cells = self.layout.num_chambers();
        for owner in &mut self.owners {
            if cells == 0 {
                *owner = 0;
            } else if *owner >= cells {
                *owner %= cells;
            }
        }
        Ok(())
    }

    /// Padded cell count of the current layout.
    pub fn num_chambers(&self) -> usize {
        self.layout.num_chambers()
    }

    /// Number of registered chamber programs (excludes padding).
    pub fn chamber_count(&self) -> usize {
        self.chambers.len()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn num_steps_taken(&self) -> u64 {
        self.num_steps_taken
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn layout(&self) -> &ChamberLayout {
        &self.layout
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    /// Mutable ball access for test harnesses.
    pub fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    pub fn owners(&self) -> &[usize] {
        &self.owners
    }

    /// Wire-format snapshot of the current state.
    pub fn snapshot(&self) -> SimulationStateMsg {
        SimulationStateMsg {
            num_steps_taken: self.num_steps_taken,
            chambers_per_row: self.config.chambers_per_row as u32,
            num_chambers: self.layout.num_chambers() as u32,
            balls: self
                .balls
                .iter()
                .zip(self.owners.iter())
                .map(|(ball, &owner)| ball_to_wire(ball, owner as u32))
                .collect(),
        }
    }

    /// Wrap every ball's position back into the unit cell, hopping its
    /// owner across the torus for each cell boundary crossed. The loops
    /// handle multi-cell crossings in a single tick.
    fn apply_wrap(&mut self) {
        let has_cells = self.layout.num_chambers() > 0;
        for (ball, owner) in self.balls.iter_mut().zip(self.owners.iter_mut()) {
            if !ball.pos.x.is_finite() || !ball.pos.y.is_finite() {
                // Left for the write-back invariant check to repair.
                continue;
            }
            while ball.pos.x < 0.0 {
                ball.pos.x += 1.0;
                if has_cells {
                    *owner = self.layout.left(*owner);
                }
            }
            while ball.pos.x >= 1.0 {
                ball.pos.x -= 1.0;
                if has_cells {
                    *owner = self.layout.right(*owner);
                }
            }
            while ball.pos.y < 0.0 {
                ball.pos.y += CHAMBER_HEIGHT;
                if has_cells {
                    *owner = self.layout.down(*owner);
                }
            }
            while ball.pos.y >= CHAMBER_HEIGHT {
                ball.pos.y -= CHAMBER_HEIGHT;
                if has_cells {
                    *owner = self.layout.up(*owner);
                }
            }
        }
    }

    /// Gather the balls overlapping `target` into the reusable view
    /// buffers, translated into the target cell's local frame.
    fn assemble_view(&mut self, target: usize) {
        self.view_balls.clear();
        self.view_meta.clear();
        for (i, ball) in self.balls.iter().enumerate() {
            if let Some(direction) = view::classify(ball, self.owners[i], target, &self.layout) {
                let mut adjusted = *ball;
                adjusted.pos += direction.offset();
                self.view_balls.push(adjusted);
                self.view_meta.push(ViewSlot {
                    ball_id: i,
                    direction,
                });
            }
        }
    }

    /// Convert the (possibly mutated) view back into each owner's frame and
    /// store it. Owner indices are not updated here; the next tick's wrap
    /// reasserts ownership consistency. Non-finite results are replaced by
    /// the ball's pre-tick state.
    fn write_back(&mut self) {
        for (slot, adjusted) in self.view_meta.iter().zip(self.view_balls.iter()) {
            let mut ball = *adjusted;
            ball.pos -= slot.direction.offset();
            if ball.is_finite() {
                self.balls[slot.ball_id] = ball;
            } else {
                tracing::warn!(
                    "ball {} left non-finite after chamber call, restoring pre-tick state",
                    slot.ball_id
                );
                self.balls[slot.ball_id] = self.tick_start_balls[slot.ball_id];
                self.owners[slot.ball_id] = self.tick_start_owners[slot.ball_id];
            }
        }
    }
}

/// Spawn a ball at a random position in the upper half of a cell, at rest.
fn spawn_ball(rng: &mut ChaCha8Rng) -> Ball {
    let x = BALL_RADIUS + rng.gen::<f32>() * (1.0 - 2.0 * BALL_RADIUS);
    let y = CHAMBER_HEIGHT / 2.0 + rng.gen::<f32>() * (CHAMBER_HEIGHT / 2.0 - BALL_RADIUS);
    Ball::new(Pos2::new(x, y), BALL_RADIUS, Vec2::ZERO)
}
