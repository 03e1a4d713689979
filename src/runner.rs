//! Wall-clock-paced simulation driver.
//!
//! Runs on a dedicated thread. Each round it takes the simulation lock,
//! works off however many ticks wall clock time owes, releases the lock,
//! and sleeps until the next tick is due. Producers (the hosting layer
//! registering chambers) share the same lock, so chambers can be appended
//! between ticks without further coordination. The shutdown flag is only
//! checked between ticks; unordered visibility is sufficient.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::STEP_LEN_NS;
use crate::sim::Simulation;

/// Drive the simulation until `shutdown` is set. Blocks the calling thread.
pub fn run_paced_loop(sim: Arc<Mutex<Simulation>>, shutdown: Arc<AtomicBool>) {
    let start = Instant::now();
    tracing::info!("simulation driver started");

    while !shutdown.load(Ordering::Relaxed) {
        let next_deadline = {
            let mut sim = sim.lock().unwrap();
            let ran = sim.step(start.elapsed());
            if ran > 1 {
                tracing::debug!("worked off {} ticks of wall-clock debt", ran);
            }
            Duration::from_nanos((sim.num_steps_taken() + 1) * STEP_LEN_NS)
        };

        let elapsed = start.elapsed();
        if next_deadline > elapsed {
            std::thread::sleep(next_deadline - elapsed);
        }
    }

    tracing::info!("simulation driver stopped");
}
