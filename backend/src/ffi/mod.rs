//! Python bindings (behind the `pyo3` feature)
//!
//! A config dict goes in and a results dict comes out. Ships, ledgers and
//! the clock stay on the Rust side.

pub mod simulation;
pub mod types;
