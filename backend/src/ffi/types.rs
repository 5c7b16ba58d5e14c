//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, PyList)

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::agent::TradingPolicy;
use crate::models::ShipRole;
use crate::orchestrator::{ShipSummary, SimulationConfig, SimulationResults};

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a field with a default value if missing.
///
/// # Errors
/// Returns error only if type conversion fails (not if field is missing)
///
/// # Example
/// ```ignore
/// let threshold: f64 = extract_with_default(&py_dict, "freight_threshold", 0.8)?;
/// ```
fn extract_with_default<'py, T>(dict: &Bound<'py, PyDict>, key: &str, default: T) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

// ========================================================================
// Configuration Parsers
// ========================================================================

/// Convert Python dict to SimulationConfig
///
/// Every key is optional and falls back to [`SimulationConfig::default`].
/// `roles` is a list of role names; `policy` a nested dict.
///
/// # Errors
///
/// Returns PyValueError if a role name is unknown, and PyTypeError if a
/// value has the wrong type. Range checks happen when the simulation is
/// built.
pub fn parse_simulation_config(py_config: &Bound<'_, PyDict>) -> PyResult<SimulationConfig> {
    let defaults = SimulationConfig::default();

    let role_names: Vec<String> = extract_with_default(py_config, "roles", Vec::new())?;
    let roles = role_names
        .iter()
        .map(|name| name.parse::<ShipRole>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let policy = match py_config.get_item("policy")? {
        Some(py_policy) => {
            let policy_dict: Bound<'_, PyDict> = py_policy.downcast_into()?;
            parse_trading_policy(&policy_dict)?
        }
        None => defaults.policy.clone(),
    };

    Ok(SimulationConfig {
        num_ships: extract_with_default(py_config, "num_ships", defaults.num_ships)?,
        duration_days: extract_with_default(py_config, "duration_days", defaults.duration_days)?,
        starting_capital: extract_with_default(
            py_config,
            "starting_capital",
            defaults.starting_capital,
        )?,
        starting_year: extract_with_default(py_config, "starting_year", defaults.starting_year)?,
        starting_day: extract_with_default(py_config, "starting_day", defaults.starting_day)?,
        speculate_cargo_pct: extract_with_default(
            py_config,
            "speculate_cargo_pct",
            defaults.speculate_cargo_pct,
        )?,
        rng_seed: extract_with_default(py_config, "rng_seed", defaults.rng_seed)?,
        roles,
        policy,
    })
}

fn parse_trading_policy(py_policy: &Bound<'_, PyDict>) -> PyResult<TradingPolicy> {
    let defaults = TradingPolicy::default();
    Ok(TradingPolicy {
        freight_threshold: extract_with_default(
            py_policy,
            "freight_threshold",
            defaults.freight_threshold,
        )?,
        max_freight_attempts: extract_with_default(
            py_policy,
            "max_freight_attempts",
            defaults.max_freight_attempts,
        )?,
        patron_bailout: extract_with_default(py_policy, "patron_bailout", defaults.patron_bailout)?,
        maintenance_days: extract_with_default(
            py_policy,
            "maintenance_days",
            defaults.maintenance_days,
        )?,
        crew_profit_share: extract_with_default(
            py_policy,
            "crew_profit_share",
            defaults.crew_profit_share,
        )?,
    })
}

// ========================================================================
// Result Converters
// ========================================================================

/// Convert SimulationResults to a Python dict
///
/// Keys mirror the Rust field names; `ships` is a list of dicts.
pub fn results_to_py<'py>(
    py: Python<'py>,
    results: &SimulationResults,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("start_date", results.start_date.to_string())?;
    dict.set_item("end_date", results.end_date.to_string())?;
    dict.set_item("duration_days", results.duration_days)?;
    dict.set_item("num_ships", results.num_ships)?;
    dict.set_item("total_voyages", results.total_voyages)?;
    dict.set_item("cargo_sales", results.total_cargo_sales)?;
    dict.set_item("total_balance", results.total_balance)?;
    dict.set_item("total_profit", results.total_profit)?;
    dict.set_item("ships_in_jump_space", results.ships_in_jump_space)?;
    dict.set_item("ships_in_port", results.ships_in_port)?;
    dict.set_item("ships_broke", results.ships_broke)?;
    dict.set_item("bailouts", results.total_bailouts)?;
    dict.set_item("events_logged", results.events_logged)?;
    dict.set_item("config_hash", &results.config_hash)?;

    let ships = PyList::empty(py);
    for ship in &results.ships {
        ships.append(ship_to_py(py, ship)?)?;
    }
    dict.set_item("ships", ships)?;
    Ok(dict)
}

fn ship_to_py<'py>(py: Python<'py>, ship: &ShipSummary) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("name", &ship.name)?;
    dict.set_item("ship_class", &ship.ship_class)?;
    dict.set_item("role", ship.role.as_str())?;
    dict.set_item("location", &ship.location)?;
    dict.set_item("destination", &ship.destination)?;
    dict.set_item("state", ship.state.name())?;
    dict.set_item("balance", ship.balance)?;
    dict.set_item("profit", ship.profit)?;
    dict.set_item("voyages", ship.voyages)?;
    dict.set_item("cargo_sales", ship.cargo_sales)?;
    dict.set_item("bailouts", ship.bailouts)?;
    dict.set_item("broke", ship.broke)?;
    dict.set_item("speculates", ship.speculates)?;
    Ok(dict)
}
