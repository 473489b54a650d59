//! Synthetic data generation for load runs and demos

pub mod generator;

pub use generator::{Simulation, SimulationReport, DEFAULT_SKILLS, MIN_SKILLS};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::association::Association;
use crate::config::SimulationConfig;

/// Run a simulation; a fixed `seed` makes the run reproducible
pub fn simulate(
    association: &mut Association,
    config: &SimulationConfig,
    seed: Option<u64>,
) -> Result<SimulationReport> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    Simulation::new(association, config, rng).run()
}
