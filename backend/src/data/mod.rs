//! Game data: static tables and the world / ship class catalogue

pub mod catalog;
pub mod tables;

pub use catalog::GameContext;

use thiserror::Error;

/// Problems with map or ship class data; these are fatal for a run
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("Invalid UWP '{uwp}': {reason}")]
    InvalidUwp { uwp: String, reason: &'static str },

    #[error("Invalid hex '{0}' (expected four digits CCRR)")]
    InvalidHex(String),

    #[error("World '{0}' not found in map data")]
    UnknownWorld(String),

    #[error("Ship class '{0}' not found")]
    UnknownShipClass(String),

    #[error("Unknown ship role '{0}' (expected civilian, military or specialized)")]
    UnknownRole(String),

    #[error("Duplicate {kind} '{name}'")]
    Duplicate { kind: &'static str, name: String },

    #[error("Ship class '{class_name}' has unknown crew position code '{code}'")]
    UnknownCrewCode { class_name: String, code: char },

    #[error("Ship class '{class_name}' is invalid: {reason}")]
    InvalidShipClass {
        class_name: String,
        reason: &'static str,
    },

    #[error("Frequency totals invalid: {0}")]
    FrequencyTotals(String),

    #[error("No ships with role '{0}' found in ship classes file")]
    NoShipsForRole(String),

    #[error("No {0} defined")]
    Empty(&'static str),

    #[error("Malformed {what} data: {message}")]
    Parse { what: &'static str, message: String },
}
