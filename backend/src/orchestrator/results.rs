//! End-of-run summaries
//!
//! [`SimulationResults`] is a plain, serializable snapshot of the fleet taken
//! from a [`Simulation`]. It carries no ids that change between runs, so
//! two runs from the same config produce the same [`SimulationResults::digest`].

use crate::core::TravellerDate;
use crate::models::{ShipRole, StarshipState};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::engine::{Simulation, SimulationError};

/// One ship at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSummary {
    pub name: String,
    pub ship_class: String,
    pub role: ShipRole,
    pub location: String,
    pub destination: String,
    pub state: StarshipState,
    pub balance: i64,
    /// Balance minus starting capital
    pub profit: i64,
    pub voyages: u32,
    pub cargo_sales: u32,
    pub bailouts: u32,
    pub broke: bool,
    pub speculates: bool,
}

/// Fleet-wide totals plus a summary per ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    pub start_date: TravellerDate,
    pub end_date: TravellerDate,
    pub duration_days: f64,
    pub num_ships: usize,
    pub total_voyages: u64,
    pub total_cargo_sales: u64,
    pub total_balance: i64,
    pub total_profit: i64,
    pub ships_in_jump_space: usize,
    pub ships_in_port: usize,
    pub ships_broke: usize,
    pub total_bailouts: u64,
    pub events_logged: usize,
    pub config_hash: String,
    pub ships: Vec<ShipSummary>,
}

impl SimulationResults {
    pub fn collect(sim: &Simulation) -> Self {
        let capital = sim.config().starting_capital;
        let ships: Vec<ShipSummary> = sim
            .agents()
            .iter()
            .map(|agent| {
                let ship = agent.ship();
                ShipSummary {
                    name: agent.name().to_string(),
                    ship_class: ship.class().class_name.clone(),
                    role: ship.class().role,
                    location: ship.location().to_string(),
                    destination: ship.destination().to_string(),
                    state: agent.state(),
                    balance: agent.balance(),
                    profit: agent.balance() - capital,
                    voyages: agent.voyage_count(),
                    cargo_sales: agent.cargo_sales(),
                    bailouts: agent.bailouts(),
                    broke: agent.is_broke(),
                    speculates: agent.speculates(),
                }
            })
            .collect();

        Self {
            start_date: sim.start_date(),
            end_date: sim.current_date(),
            duration_days: sim.now(),
            num_ships: ships.len(),
            total_voyages: ships.iter().map(|s| u64::from(s.voyages)).sum(),
            total_cargo_sales: ships.iter().map(|s| u64::from(s.cargo_sales)).sum(),
            total_balance: ships.iter().map(|s| s.balance).sum(),
            total_profit: ships.iter().map(|s| s.profit).sum(),
            ships_in_jump_space: ships.iter().filter(|s| s.state.is_in_jump_space()).count(),
            ships_in_port: ships.iter().filter(|s| s.state.is_in_port()).count(),
            ships_broke: ships.iter().filter(|s| s.broke).count(),
            total_bailouts: ships.iter().map(|s| u64::from(s.bailouts)).sum(),
            events_logged: sim.events().len(),
            config_hash: sim.config_hash().to_string(),
            ships,
        }
    }

    pub fn average_voyages(&self) -> f64 {
        if self.num_ships == 0 {
            0.0
        } else {
            self.total_voyages as f64 / self.num_ships as f64
        }
    }

    pub fn average_profit(&self) -> f64 {
        if self.num_ships == 0 {
            0.0
        } else {
            self.total_profit as f64 / self.num_ships as f64
        }
    }

    /// Solvent ships of `role` (all roles when `None`), richest first
    pub fn ranked(&self, role: Option<ShipRole>) -> Vec<&ShipSummary> {
        let mut ranked: Vec<&ShipSummary> = self
            .ships
            .iter()
            .filter(|s| !s.broke && role.map_or(true, |r| s.role == r))
            .collect();
        ranked.sort_by(|a, b| b.balance.cmp(&a.balance).then_with(|| a.name.cmp(&b.name)));
        ranked
    }

    /// The `count` richest solvent ships
    pub fn top(&self, role: Option<ShipRole>, count: usize) -> Vec<&ShipSummary> {
        self.ranked(role).into_iter().take(count).collect()
    }

    /// The `count` poorest solvent ships, still richest first
    pub fn bottom(&self, role: Option<ShipRole>, count: usize) -> Vec<&ShipSummary> {
        let ranked = self.ranked(role);
        let skip = ranked.len().saturating_sub(count);
        ranked.into_iter().skip(skip).collect()
    }

    pub fn broke_ships(&self) -> Vec<&ShipSummary> {
        self.ships.iter().filter(|s| s.broke).collect()
    }

    /// Roles present in the fleet, in role order
    pub fn roles(&self) -> Vec<ShipRole> {
        ShipRole::ALL
            .into_iter()
            .filter(|r| self.ships.iter().any(|s| s.role == *r))
            .collect()
    }

    /// SHA-256 fingerprint of the whole snapshot
    pub fn digest(&self) -> Result<String, SimulationError> {
        compute_config_hash(self)
    }
}

/// Compute SHA256 hash of a serializable value
///
/// Uses canonical JSON serialization with sorted keys so the hash does not
/// depend on field or map ordering.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    // Recursively sort all object keys
    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
