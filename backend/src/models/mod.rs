//! Domain models for the trading simulator

pub mod event;
pub mod lot;
pub mod mail;
pub mod npc;
pub mod ship_class;
pub mod starship;
pub mod state;
pub mod world;

// Re-exports
pub use event::{DestinationReason, Event, EventLog};
pub use lot::{Lot, LotKind};
pub use mail::MailBundle;
pub use npc::{Npc, NpcError, NpcStatus};
pub use ship_class::{CrewRole, ShipClass, ShipRole};
pub use starship::{FuelTanks, MaintenanceSchedule, PassageClass, ShipError, Starship};
pub use state::StarshipState;
pub use world::{Hex, StarportClass, TradeCode, Uwp, World, WorldRecord};
