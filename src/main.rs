use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chamber_machine::chambers::{PlatformsChamber, SimpleChamber};
use chamber_machine::config::SimConfig;
use chamber_machine::runner::run_paced_loop;
use chamber_machine::sim::Simulation;

/// Headless demo: run the simulation with the stock chambers for a few
/// seconds and print a state snapshot.
fn main() {
    tracing_subscriber::fmt::init();

    let config = SimConfig::default();
    if let Err(e) = config.validate() {
        eprintln!("Invalid simulation configuration: {}", e);
        std::process::exit(1);
    }

    let mut sim = Simulation::with_config(42, config);
    sim.add_chamber(Box::new(SimpleChamber::new())).unwrap();
    sim.add_chamber(Box::new(PlatformsChamber::new())).unwrap();
    tracing::info!(
        "running {} chambers, {} balls",
        sim.chamber_count(),
        sim.balls().len()
    );

    let sim = Arc::new(Mutex::new(sim));
    let shutdown = Arc::new(AtomicBool::new(false));

    let driver = {
        let sim = sim.clone();
        let shutdown = shutdown.clone();
        std::thread::spawn(move || run_paced_loop(sim, shutdown))
    };

    std::thread::sleep(Duration::from_secs(3));
    shutdown.store(true, Ordering::Relaxed);
    driver.join().expect("driver thread panicked");

    let sim = sim.lock().unwrap();
    tracing::info!("ran {} ticks", sim.num_steps_taken());
    let snapshot = sim.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot).unwrap());
}
