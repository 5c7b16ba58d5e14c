//! Operating states of a merchant starship
//!
//! A ship cycles through fourteen states: port business, departure, jump
//! and arrival, plus an annual maintenance stop. Each state has a nominal
//! duration in days and a fixed successor.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StarshipState {
    Docked,
    Offloading,
    SellingCargo,
    LoadingFreight,
    LoadingCargo,
    LoadingMail,
    LoadingPassengers,
    LoadingFuel,
    Departing,
    ManeuveringToJump,
    Jumping,
    ManeuveringToPort,
    Arriving,
    Maintenance,
}

/// The voyage order, starting where a ship emerges from jump
pub const TRADING_VOYAGE_CYCLE: [StarshipState; 13] = [
    StarshipState::ManeuveringToPort,
    StarshipState::Arriving,
    StarshipState::Docked,
    StarshipState::Offloading,
    StarshipState::SellingCargo,
    StarshipState::LoadingFreight,
    StarshipState::LoadingCargo,
    StarshipState::LoadingMail,
    StarshipState::LoadingPassengers,
    StarshipState::LoadingFuel,
    StarshipState::Departing,
    StarshipState::ManeuveringToJump,
    StarshipState::Jumping,
];

impl StarshipState {
    pub const ALL: [StarshipState; 14] = [
        StarshipState::Docked,
        StarshipState::Offloading,
        StarshipState::SellingCargo,
        StarshipState::LoadingFreight,
        StarshipState::LoadingCargo,
        StarshipState::LoadingMail,
        StarshipState::LoadingPassengers,
        StarshipState::LoadingFuel,
        StarshipState::Departing,
        StarshipState::ManeuveringToJump,
        StarshipState::Jumping,
        StarshipState::ManeuveringToPort,
        StarshipState::Arriving,
        StarshipState::Maintenance,
    ];

    /// Nominal time spent in this state, in days
    ///
    /// Refueling actually takes a dice roll of hours; the figure here is a
    /// typical value used for planning.
    pub fn nominal_duration(&self) -> f64 {
        match self {
            StarshipState::Docked => 0.0,
            StarshipState::Offloading => 0.25,
            StarshipState::SellingCargo => 0.5,
            StarshipState::LoadingFreight => 1.0,
            StarshipState::LoadingCargo => 0.5,
            StarshipState::LoadingMail => 0.1,
            StarshipState::LoadingPassengers => 0.25,
            StarshipState::LoadingFuel => 0.35,
            StarshipState::Departing => 0.1,
            StarshipState::ManeuveringToJump => 0.5,
            StarshipState::Jumping => 7.0,
            StarshipState::ManeuveringToPort => 0.5,
            StarshipState::Arriving => 0.1,
            StarshipState::Maintenance => 14.0,
        }
    }

    /// Successor in the trading cycle
    ///
    /// ```
    /// use t5sim_core::StarshipState;
    ///
    /// assert_eq!(StarshipState::Jumping.next(), StarshipState::ManeuveringToPort);
    /// assert_eq!(StarshipState::Maintenance.next(), StarshipState::LoadingFreight);
    /// ```
    pub fn next(&self) -> StarshipState {
        match self {
            StarshipState::Docked => StarshipState::Offloading,
            StarshipState::Offloading => StarshipState::SellingCargo,
            StarshipState::SellingCargo => StarshipState::LoadingFreight,
            StarshipState::LoadingFreight => StarshipState::LoadingCargo,
            StarshipState::LoadingCargo => StarshipState::LoadingMail,
            StarshipState::LoadingMail => StarshipState::LoadingPassengers,
            StarshipState::LoadingPassengers => StarshipState::LoadingFuel,
            StarshipState::LoadingFuel => StarshipState::Departing,
            StarshipState::Departing => StarshipState::ManeuveringToJump,
            StarshipState::ManeuveringToJump => StarshipState::Jumping,
            StarshipState::Jumping => StarshipState::ManeuveringToPort,
            StarshipState::ManeuveringToPort => StarshipState::Arriving,
            StarshipState::Arriving => StarshipState::Docked,
            StarshipState::Maintenance => StarshipState::LoadingFreight,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StarshipState::Docked => "DOCKED",
            StarshipState::Offloading => "OFFLOADING",
            StarshipState::SellingCargo => "SELLING_CARGO",
            StarshipState::LoadingFreight => "LOADING_FREIGHT",
            StarshipState::LoadingCargo => "LOADING_CARGO",
            StarshipState::LoadingMail => "LOADING_MAIL",
            StarshipState::LoadingPassengers => "LOADING_PASSENGERS",
            StarshipState::LoadingFuel => "LOADING_FUEL",
            StarshipState::Departing => "DEPARTING",
            StarshipState::ManeuveringToJump => "MANEUVERING_TO_JUMP",
            StarshipState::Jumping => "JUMPING",
            StarshipState::ManeuveringToPort => "MANEUVERING_TO_PORT",
            StarshipState::Arriving => "ARRIVING",
            StarshipState::Maintenance => "MAINTENANCE",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            StarshipState::Docked => "Ship docked at starport, ready for business",
            StarshipState::Offloading => "Offloading passengers, mail, and freight",
            StarshipState::SellingCargo => "Selling speculative cargo through brokers",
            StarshipState::LoadingFreight => "Searching for freight lots (multi-day)",
            StarshipState::LoadingCargo => "Purchasing speculative cargo",
            StarshipState::LoadingMail => "Loading mail bundles for delivery",
            StarshipState::LoadingPassengers => "Boarding high/mid/low passengers",
            StarshipState::LoadingFuel => "Refueling from starport depot",
            StarshipState::Departing => "Final departure checks and clearance",
            StarshipState::ManeuveringToJump => "Traveling to jump point (100D limit)",
            StarshipState::Jumping => "In jump space (7 days transit)",
            StarshipState::ManeuveringToPort => "Traveling from emergence to starport",
            StarshipState::Arriving => "Arrival procedures and docking clearance",
            StarshipState::Maintenance => "Annual maintenance at shipyard",
        }
    }

    pub fn is_in_jump_space(&self) -> bool {
        matches!(self, StarshipState::Jumping)
    }

    /// Tied up at a starport (docked, trading, refueling or in the yard)
    pub fn is_in_port(&self) -> bool {
        matches!(
            self,
            StarshipState::Docked
                | StarshipState::Offloading
                | StarshipState::SellingCargo
                | StarshipState::LoadingFreight
                | StarshipState::LoadingCargo
                | StarshipState::LoadingMail
                | StarshipState::LoadingPassengers
                | StarshipState::LoadingFuel
                | StarshipState::Maintenance
        )
    }
}

impl fmt::Display for StarshipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Nominal length of one round of the voyage cycle in days
pub fn voyage_cycle_duration() -> f64 {
    TRADING_VOYAGE_CYCLE
        .iter()
        .map(StarshipState::nominal_duration)
        .sum()
}
