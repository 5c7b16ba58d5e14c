//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm. All randomness in the simulator goes
//! through this module; the results depend on nothing else.

mod xorshift;

pub use xorshift::RngManager;
