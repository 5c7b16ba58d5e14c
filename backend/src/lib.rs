//! T5 Simulator Core - Rust Engine
//!
//! Discrete-event simulation of merchant starships trading across a
//! Traveller subsector, with deterministic execution and double-entry books.
//!
//! # Architecture
//!
//! - **core**: Simulation clock and the Traveller calendar
//! - **rng**: Deterministic random number generation and dice
//! - **finance**: Accounts, ledger transfers and companies
//! - **data**: Rule tables and the world / ship class catalogue
//! - **models**: Domain types (World, Lot, Npc, Starship, states, events)
//! - **agent**: The per-ship trading and payroll tasks
//! - **orchestrator**: Fleet setup, the main loop, results and reports
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 Credits
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Money only moves through ledger transfers, so every account balance
//!    equals the sum of its entries
//! 4. FFI boundary is minimal and safe
//!
//! # Example
//!
//! ```rust
//! use t5sim_core::{GameContext, Simulation, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     num_ships: 2,
//!     duration_days: 14.0,
//!     rng_seed: 99,
//!     ..SimulationConfig::default()
//! };
//! let mut sim = Simulation::new(config, GameContext::embedded().unwrap()).unwrap();
//! let results = sim.run().unwrap();
//! assert_eq!(results.ships.len(), 2);
//! assert_eq!(results.duration_days, 14.0);
//! ```

// Module declarations
pub mod agent;
pub mod core;
pub mod data;
pub mod finance;
pub mod models;
pub mod orchestrator;
pub mod rng;

// Re-exports for convenience
pub use agent::{AgentContext, StarshipAgent, TradingPolicy};
pub use crate::core::{Clock, TravellerDate};
pub use data::{DataError, GameContext};
pub use finance::{Account, Company, FinanceError, Ledger, LedgerEntry};
pub use models::{
    event::{Event, EventLog},
    lot::Lot,
    npc::Npc,
    ship_class::{ShipClass, ShipRole},
    starship::{ShipError, Starship},
    state::StarshipState,
    world::{Hex, World},
};
pub use orchestrator::{Simulation, SimulationConfig, SimulationError, SimulationResults};
pub use rng::RngManager;

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn t5sim_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::simulation::PySimulation>()?;
    Ok(())
}
