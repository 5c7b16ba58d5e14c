//! Event logging for simulation replay and auditing.
//!
//! Every significant thing a ship does is recorded as an [`Event`] carrying
//! the simulated day it happened and the ship's name. The log makes a run
//! auditable after the fact and gives tests something to assert on.
//!
//! # Event Types
//!
//! - **Voyage**: state changes, destination choice, jumps
//! - **Trade**: cargo bought and sold, freight, passengers, mail
//! - **Upkeep**: refueling, payroll, maintenance
//! - **Solvency**: patron bailouts and ships going broke
//!
//! # Example
//!
//! ```rust
//! use t5sim_core::models::Event;
//!
//! let event = Event::Jumped {
//!     day: 6.2,
//!     ship: "Trader_001".to_string(),
//!     from: "Rhylanor".to_string(),
//!     to: "Porozlo".to_string(),
//!     parsecs: 1,
//! };
//!
//! assert_eq!(event.event_type(), "Jumped");
//! assert_eq!(event.ship(), "Trader_001");
//! ```

use crate::models::state::StarshipState;
use serde::{Deserialize, Serialize};

/// Why a destination was picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestinationReason {
    /// Best expected cargo margin among reachable worlds
    Profitable,
    /// No profitable world in range; picked at random
    Random,
    /// Nothing in range; the ship stays where it is
    Stranded,
}

/// Simulation event capturing something a ship did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    StateChanged {
        day: f64,
        ship: String,
        from: StarshipState,
        to: StarshipState,
    },

    DestinationChosen {
        day: f64,
        ship: String,
        destination: String,
        reason: DestinationReason,
        /// Expected margin per ton when chosen for profit
        margin_per_ton: Option<i64>,
    },

    Jumped {
        day: f64,
        ship: String,
        from: String,
        to: String,
        parsecs: u32,
    },

    /// Jump could not be made (not enough jump fuel)
    JumpAborted {
        day: f64,
        ship: String,
        destination: String,
        reason: String,
    },

    CargoPurchased {
        day: f64,
        ship: String,
        world: String,
        lots: usize,
        tons: u32,
        cost: i64,
        /// Lots passed over as unprofitable at the destination
        skipped: usize,
    },

    CargoSold {
        day: f64,
        ship: String,
        world: String,
        lot_id: String,
        tons: u32,
        revenue: i64,
        profit: i64,
    },

    FreightLoaded {
        day: f64,
        ship: String,
        world: String,
        tons: u32,
        payment: i64,
    },

    FreightDelivered {
        day: f64,
        ship: String,
        world: String,
        lots: usize,
        tons: u32,
    },

    PassengersBoarded {
        day: f64,
        ship: String,
        high: u32,
        mid: u32,
        low: u32,
        fares: i64,
    },

    PassengersDisembarked {
        day: f64,
        ship: String,
        high: u32,
        mid: u32,
        low: u32,
        /// Low passengers who did not survive revival
        low_deaths: u32,
    },

    MailLoaded {
        day: f64,
        ship: String,
        origin: String,
        destination: String,
    },

    MailDelivered {
        day: f64,
        ship: String,
        bundles: usize,
        payment: i64,
    },

    Refueled {
        day: f64,
        ship: String,
        world: String,
        tons: u32,
        cost: i64,
        refined: bool,
        /// Only part of the tanks could be paid for
        partial: bool,
    },

    Payroll {
        day: f64,
        ship: String,
        month: u32,
        crew: usize,
        amount: i64,
    },

    Maintenance {
        day: f64,
        ship: String,
        year: u32,
        cost: i64,
        crew_share: i64,
        annual_profit: i64,
    },

    PatronBailout {
        day: f64,
        ship: String,
        amount: i64,
        reason: String,
    },

    Broke {
        day: f64,
        ship: String,
        reason: String,
        required: i64,
        available: i64,
    },
}

impl Event {
    /// Simulated day of the event
    pub fn day(&self) -> f64 {
        match self {
            Event::StateChanged { day, .. }
            | Event::DestinationChosen { day, .. }
            | Event::Jumped { day, .. }
            | Event::JumpAborted { day, .. }
            | Event::CargoPurchased { day, .. }
            | Event::CargoSold { day, .. }
            | Event::FreightLoaded { day, .. }
            | Event::FreightDelivered { day, .. }
            | Event::PassengersBoarded { day, .. }
            | Event::PassengersDisembarked { day, .. }
            | Event::MailLoaded { day, .. }
            | Event::MailDelivered { day, .. }
            | Event::Refueled { day, .. }
            | Event::Payroll { day, .. }
            | Event::Maintenance { day, .. }
            | Event::PatronBailout { day, .. }
            | Event::Broke { day, .. } => *day,
        }
    }

    /// Name of the ship involved
    pub fn ship(&self) -> &str {
        match self {
            Event::StateChanged { ship, .. }
            | Event::DestinationChosen { ship, .. }
            | Event::Jumped { ship, .. }
            | Event::JumpAborted { ship, .. }
            | Event::CargoPurchased { ship, .. }
            | Event::CargoSold { ship, .. }
            | Event::FreightLoaded { ship, .. }
            | Event::FreightDelivered { ship, .. }
            | Event::PassengersBoarded { ship, .. }
            | Event::PassengersDisembarked { ship, .. }
            | Event::MailLoaded { ship, .. }
            | Event::MailDelivered { ship, .. }
            | Event::Refueled { ship, .. }
            | Event::Payroll { ship, .. }
            | Event::Maintenance { ship, .. }
            | Event::PatronBailout { ship, .. }
            | Event::Broke { ship, .. } => ship,
        }
    }

    /// Event type as a string (for filtering and display)
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::StateChanged { .. } => "StateChanged",
            Event::DestinationChosen { .. } => "DestinationChosen",
            Event::Jumped { .. } => "Jumped",
            Event::JumpAborted { .. } => "JumpAborted",
            Event::CargoPurchased { .. } => "CargoPurchased",
            Event::CargoSold { .. } => "CargoSold",
            Event::FreightLoaded { .. } => "FreightLoaded",
            Event::FreightDelivered { .. } => "FreightDelivered",
            Event::PassengersBoarded { .. } => "PassengersBoarded",
            Event::PassengersDisembarked { .. } => "PassengersDisembarked",
            Event::MailLoaded { .. } => "MailLoaded",
            Event::MailDelivered { .. } => "MailDelivered",
            Event::Refueled { .. } => "Refueled",
            Event::Payroll { .. } => "Payroll",
            Event::Maintenance { .. } => "Maintenance",
            Event::PatronBailout { .. } => "PatronBailout",
            Event::Broke { .. } => "Broke",
        }
    }
}

/// Event log for storing simulation events.
///
/// Events are appended in the order they happen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific ship
    pub fn events_for_ship(&self, ship: &str) -> Vec<&Event> {
        self.events.iter().filter(|e| e.ship() == ship).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payroll(ship: &str, day: f64) -> Event {
        Event::Payroll {
            day,
            ship: ship.to_string(),
            month: 1,
            crew: 3,
            amount: 300,
        }
    }

    #[test]
    fn test_event_accessors() {
        let event = payroll("Trader_001", 2.0);
        assert_eq!(event.day(), 2.0);
        assert_eq!(event.ship(), "Trader_001");
        assert_eq!(event.event_type(), "Payroll");
    }

    #[test]
    fn test_event_log_filters() {
        let mut log = EventLog::new();
        log.log(payroll("Trader_001", 2.0));
        log.log(payroll("Trader_002", 2.0));
        log.log(Event::Broke {
            day: 3.0,
            ship: "Trader_002".to_string(),
            reason: "fuel".to_string(),
            required: 500,
            available: 10,
        });

        assert_eq!(log.len(), 3);
        assert_eq!(log.events_of_type("Payroll").len(), 2);
        assert_eq!(log.events_for_ship("Trader_002").len(), 2);

        log.clear();
        assert!(log.is_empty());
    }
}
