//! PyO3 wrapper for Simulation

use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{parse_simulation_config, results_to_py};
use crate::data::GameContext;
use crate::orchestrator::report::ledger_report;
use crate::orchestrator::{Simulation as RustSimulation, SimulationConfig, SimulationError};

fn to_py_err(err: SimulationError) -> PyErr {
    match err {
        SimulationError::InvalidConfig(_) | SimulationError::Finance(_) => {
            PyValueError::new_err(err.to_string())
        }
        SimulationError::ShipNotFound(_) => PyKeyError::new_err(err.to_string()),
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Python wrapper for Rust Simulation
///
/// # Example (from Python)
///
/// ```python
/// from t5sim_core import Simulation
///
/// sim = Simulation({"num_ships": 5, "duration_days": 120, "rng_seed": 7})
/// results = sim.run()
/// print(f"{results['total_voyages']} voyages, profit Cr{results['total_profit']:,}")
/// ```
#[pyclass(name = "Simulation")]
pub struct PySimulation {
    inner: RustSimulation,
}

#[pymethods]
impl PySimulation {
    /// Build a fleet on the embedded subsector
    ///
    /// Raises ValueError for bad config values and RuntimeError for data
    /// problems.
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let config = match config {
            Some(dict) => parse_simulation_config(dict)?,
            None => SimulationConfig::default(),
        };
        let game = GameContext::embedded().map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        let inner = RustSimulation::new(config, game).map_err(to_py_err)?;
        Ok(PySimulation { inner })
    }

    /// Run to the configured duration and return the results dict
    fn run(&mut self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let results = self.inner.run().map_err(to_py_err)?;
        Ok(results_to_py(py, &results)?.unbind())
    }

    /// Advance to `until` days without summarizing
    fn run_until(&mut self, until: f64) -> PyResult<()> {
        self.inner.run_until(until).map_err(to_py_err)
    }

    /// Results as of the current time
    fn results(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        Ok(results_to_py(py, &self.inner.results())?.unbind())
    }

    fn now(&self) -> f64 {
        self.inner.now()
    }

    fn current_date(&self) -> String {
        self.inner.current_date().to_string()
    }

    fn config_hash(&self) -> String {
        self.inner.config_hash().to_string()
    }

    fn ship_names(&self) -> Vec<String> {
        self.inner.agents().iter().map(|a| a.name().to_string()).collect()
    }

    /// Cash balance of one ship's company, or None if there is no such ship
    fn get_ship_balance(&self, name: &str) -> Option<i64> {
        self.inner.agent(name).ok().map(|a| a.balance())
    }

    /// Printable ledger for one ship
    fn ledger(&self, name: &str) -> PyResult<String> {
        let agent = self.inner.agent(name).map_err(to_py_err)?;
        Ok(ledger_report(agent, self.inner.start_date()))
    }
}
