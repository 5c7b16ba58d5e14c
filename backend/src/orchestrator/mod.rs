//! Orchestrator - fleet setup, the main simulation loop and reporting
//!
//! See `engine.rs` for the loop itself.

pub mod engine;
pub mod report;
pub mod results;

pub use engine::{
    Simulation, SimulationConfig, SimulationError, TaskKey, TaskKind, STARTING_WORLD_ATTEMPTS,
};
pub use results::{compute_config_hash, ShipSummary, SimulationResults};
