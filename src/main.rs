use std::time::Instant;

use transit_sim::{PlanResult, Simulation, SimulationParams};

/// Number of frames to simulate.
const NUM_FRAMES: usize = 350;

fn main() -> PlanResult<()> {
    let params = SimulationParams::default();
    let lines = usize::max(params.vehicle_count / 4, 1);
    let mut sim = Simulation::new(params)?;
    sim.add_grid_routes(lines, lines);
    sim.add_vehicles()?;

    println!("Simulating...");
    let start = Instant::now();
    for _ in 0..NUM_FRAMES {
        sim.step(1.0)?;
    }
    let elapsed = start.elapsed();

    let trips = sim.trip_durations();
    let mean = trips.iter().map(|(_, duration)| duration).sum::<f64>() / trips.len().max(1) as f64;
    println!(
        "{} frames in {:?}: {} trips completed (mean duration {:.1}), {} still travelling",
        sim.frame(),
        elapsed,
        trips.len(),
        mean,
        sim.iter_passengers().count(),
    );
    for (start_time, duration) in trips {
        println!("{:>8.1} {:>8.1}", start_time, duration);
    }
    Ok(())
}
