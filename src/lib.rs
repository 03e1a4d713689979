//! Deterministic fixed-timestep 2D ball simulation driven by pluggable
//! chamber programs.
//!
//! Balls live on a toroidal grid of **chambers** — user-supplied programs
//! that each own one grid cell and get to perturb the balls overlapping it
//! every tick. Balls cross cell boundaries freely; each chamber only ever
//! sees local coordinates. The engine is the part that makes this composable:
//! a fixed-step integrator, the wrap/ownership bookkeeping, per-chamber view
//! assembly with exact inverse write-back, and a collision kernel shared
//! with chamber programs.
//!
//! # Architecture
//!
//! - **`vec2`** — position/vector algebra and oriented surface segments.
//! - **`collision`** — point-through-surface resolution, ball–surface
//!   response, ball–ball restitution.
//! - **`ball`** — ball state and the gravity/clamp/Euler integrator.
//! - **`layout`** — toroidal grid topology with full-row padding.
//! - **`view`** — per-chamber view classification and the direction-tagged
//!   boundary translations.
//! - **`sim`** — `Simulation`: ownership, wrap, tick orchestration,
//!   write-back, and the public engine API.
//! - **`chamber`** — the `Chamber` capability implemented by external
//!   programs; **`chambers`** ships in-process reference programs.
//! - **`config`** — physics constants and `SimConfig`.
//! - **`protocol`** — JSON snapshot types for the hosting layer.
//! - **`runner`** — wall-clock-paced driver loop.
//!
//! The sandbox host that loads untrusted chamber programs, and every
//! network/storage/UI concern, live outside this crate.

pub mod ball;
pub mod chamber;
pub mod chambers;
pub mod collision;
pub mod config;
pub mod layout;
pub mod protocol;
pub mod runner;
pub mod sim;
pub mod vec2;
pub mod view;
