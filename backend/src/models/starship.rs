//! Starship model
//!
//! Represents one hull and everything aboard it:
//! - Cargo hold shared by speculative cargo and freight
//! - Staterooms (high and middle passengers) and low berths
//! - Mail locker
//! - Jump and operations fuel tanks
//! - Crew positions from the ship class
//! - Annual maintenance schedule
//!
//! Capacity limits are enforced here; every load either fits or fails
//! without changing anything.

use crate::core::TravellerDate;
use crate::models::lot::{Lot, LotKind};
use crate::models::mail::MailBundle;
use crate::models::npc::Npc;
use crate::models::ship_class::{CrewRole, ShipClass};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by starship operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShipError {
    #[error("Capacity exceeded: need {required} {capacity}, only {available} available")]
    CapacityExceeded {
        capacity: &'static str,
        required: u32,
        available: u32,
    },

    #[error("Duplicate {item}: {serial} is already aboard")]
    DuplicateItem { item: &'static str, serial: Uuid },

    #[error("Invalid passage class '{0}'. Must be one of: high, mid, low")]
    InvalidPassageClass(String),

    #[error("Starship mail locker size exceeded.")]
    MailLockerFull,

    #[error("Starship has no mail to offload.")]
    NoMailToOffload,

    #[error("No mail offered from {origin} to {destination}")]
    NoMailForRoute { origin: String, destination: String },

    #[error("Lot {0} not found aboard")]
    LotNotFound(Uuid),

    #[error("Cannot load an empty lot")]
    EmptyLot,

    #[error("Threshold must be between 0 and 1, got {0}")]
    InvalidThreshold(f64),

    #[error("Insufficient {tank} fuel: need {required} tons, have {available}")]
    InsufficientFuel {
        tank: &'static str,
        required: u32,
        available: u32,
    },

    #[error("No vacant {0} position aboard")]
    NoVacantPosition(&'static str),
}

// ============================================================================
// Passengers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassageClass {
    High,
    Mid,
    Low,
}

impl PassageClass {
    pub const ALL: [PassageClass; 3] = [PassageClass::High, PassageClass::Mid, PassageClass::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            PassageClass::High => "high",
            PassageClass::Mid => "mid",
            PassageClass::Low => "low",
        }
    }
}

impl fmt::Display for PassageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassageClass {
    type Err = ShipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(PassageClass::High),
            "mid" => Ok(PassageClass::Mid),
            "low" => Ok(PassageClass::Low),
            other => Err(ShipError::InvalidPassageClass(other.to_string())),
        }
    }
}

// ============================================================================
// Fuel
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelTanks {
    jump: u32,
    jump_capacity: u32,
    ops: u32,
    ops_capacity: u32,
}

impl FuelTanks {
    /// Tanks filled to capacity
    pub fn full(jump_capacity: u32, ops_capacity: u32) -> Self {
        Self {
            jump: jump_capacity,
            jump_capacity,
            ops: ops_capacity,
            ops_capacity,
        }
    }

    pub fn jump(&self) -> u32 {
        self.jump
    }

    pub fn ops(&self) -> u32 {
        self.ops
    }

    pub fn jump_capacity(&self) -> u32 {
        self.jump_capacity
    }

    pub fn ops_capacity(&self) -> u32 {
        self.ops_capacity
    }

    /// Tons needed to top off both tanks
    pub fn tons_needed(&self) -> u32 {
        (self.jump_capacity - self.jump) + (self.ops_capacity - self.ops)
    }

    pub fn is_full(&self) -> bool {
        self.tons_needed() == 0
    }

    /// Add fuel, jump tank first; returns the tons actually taken aboard
    pub fn fill(&mut self, tons: u32) -> u32 {
        let to_jump = tons.min(self.jump_capacity - self.jump);
        self.jump += to_jump;
        let to_ops = (tons - to_jump).min(self.ops_capacity - self.ops);
        self.ops += to_ops;
        to_jump + to_ops
    }

    pub fn burn_jump(&mut self, tons: u32) -> Result<(), ShipError> {
        if tons > self.jump {
            return Err(ShipError::InsufficientFuel {
                tank: "jump",
                required: tons,
                available: self.jump,
            });
        }
        self.jump -= tons;
        Ok(())
    }

    pub fn burn_ops(&mut self, tons: u32) -> Result<(), ShipError> {
        if tons > self.ops {
            return Err(ShipError::InsufficientFuel {
                tank: "operations",
                required: tons,
                available: self.ops,
            });
        }
        self.ops -= tons;
        Ok(())
    }
}

// ============================================================================
// Maintenance
// ============================================================================

/// When the ship next goes into the yard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    /// Day of year maintenance falls due, in 2..=365
    pub annual_day: u32,
    /// Year of the most recent maintenance
    pub last_year: u32,
    pub needs_maintenance: bool,
}

impl MaintenanceSchedule {
    /// Pick a random maintenance day; the ship is first due in `starting_year`
    pub fn roll(rng: &mut RngManager, starting_year: u32) -> Self {
        Self {
            annual_day: rng.range(2, 366) as u32,
            last_year: starting_year.saturating_sub(1),
            needs_maintenance: false,
        }
    }

    /// Due once the maintenance day is reached in a year not yet serviced
    pub fn is_due(&self, date: TravellerDate) -> bool {
        date.day().min(365) >= self.annual_day && self.last_year < date.year()
    }

    pub fn complete(&mut self, year: u32) {
        self.last_year = year;
        self.needs_maintenance = false;
    }
}

// ============================================================================
// Crew
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewPosition {
    role: CrewRole,
    member: Option<Npc>,
}

impl CrewPosition {
    pub fn role(&self) -> CrewRole {
        self.role
    }

    pub fn member(&self) -> Option<&Npc> {
        self.member.as_ref()
    }

    pub fn is_filled(&self) -> bool {
        self.member.is_some()
    }
}

// ============================================================================
// Starship
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Starship {
    name: String,
    class: ShipClass,
    location: String,
    destination: String,
    owner: Option<Uuid>,

    cargo: Vec<Lot>,
    freight: Vec<Lot>,

    high_passengers: Vec<Npc>,
    mid_passengers: Vec<Npc>,
    low_passengers: Vec<Npc>,

    mail: Vec<MailBundle>,
    mail_locker_size: usize,

    fuel: FuelTanks,
    crew: Vec<CrewPosition>,
    maintenance: MaintenanceSchedule,
}

impl Starship {
    /// A new ship in port with full tanks, an empty hold and vacant crew
    /// positions; its destination starts out as its location
    pub fn new(name: impl Into<String>, location: impl Into<String>, class: ShipClass) -> Self {
        let location = location.into();
        let crew = class
            .crew_roles()
            .into_iter()
            .map(|role| CrewPosition { role, member: None })
            .collect();
        Self {
            name: name.into(),
            destination: location.clone(),
            location,
            owner: None,
            cargo: Vec::new(),
            freight: Vec::new(),
            high_passengers: Vec::new(),
            mid_passengers: Vec::new(),
            low_passengers: Vec::new(),
            mail: Vec::new(),
            mail_locker_size: 1,
            fuel: FuelTanks::full(class.jump_fuel_capacity, class.ops_fuel_capacity),
            crew,
            maintenance: MaintenanceSchedule {
                annual_day: 365,
                last_year: 0,
                needs_maintenance: false,
            },
            class,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> &ShipClass {
        &self.class
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn owner(&self) -> Option<Uuid> {
        self.owner
    }

    pub fn set_owner(&mut self, owner: Uuid) {
        self.owner = Some(owner);
    }

    pub fn set_course_for(&mut self, destination: impl Into<String>) {
        self.destination = destination.into();
    }

    /// Jump to the current destination, burning fuel for `parsecs`
    ///
    /// On insufficient fuel nothing changes.
    pub fn jump(&mut self, parsecs: u32) -> Result<(), ShipError> {
        let fuel = parsecs * self.class.jump_fuel_per_parsec();
        self.fuel.burn_jump(fuel)?;
        self.location = self.destination.clone();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Hold
    // ------------------------------------------------------------------------

    pub fn hold_size(&self) -> u32 {
        self.class.cargo_capacity
    }

    /// Tons in the hold (cargo plus freight)
    pub fn cargo_size(&self) -> u32 {
        self.cargo.iter().chain(&self.freight).map(Lot::mass).sum()
    }

    pub fn free_space(&self) -> u32 {
        self.hold_size().saturating_sub(self.cargo_size())
    }

    pub fn cargo_lots(&self) -> &[Lot] {
        &self.cargo
    }

    pub fn freight_lots(&self) -> &[Lot] {
        &self.freight
    }

    /// Whether the hold is filled to at least `threshold` of capacity
    pub fn is_hold_mostly_full(&self, threshold: f64) -> Result<bool, ShipError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ShipError::InvalidThreshold(threshold));
        }
        if self.hold_size() == 0 {
            return Ok(true);
        }
        Ok(f64::from(self.cargo_size()) / f64::from(self.hold_size()) >= threshold)
    }

    pub fn can_onload_lot(&self, lot: &Lot) -> Result<(), ShipError> {
        if lot.mass() == 0 {
            return Err(ShipError::EmptyLot);
        }
        if self.cargo.contains(lot) || self.freight.contains(lot) {
            return Err(ShipError::DuplicateItem {
                item: "lot",
                serial: lot.serial(),
            });
        }
        if lot.mass() > self.free_space() {
            return Err(ShipError::CapacityExceeded {
                capacity: "tons of hold space",
                required: lot.mass(),
                available: self.free_space(),
            });
        }
        Ok(())
    }

    pub fn onload_lot(&mut self, lot: Lot) -> Result<(), ShipError> {
        self.can_onload_lot(&lot)?;
        match lot.kind() {
            LotKind::Cargo => self.cargo.push(lot),
            LotKind::Freight => self.freight.push(lot),
        }
        Ok(())
    }

    pub fn offload_lot(&mut self, serial: Uuid) -> Result<Lot, ShipError> {
        if let Some(i) = self.cargo.iter().position(|l| l.serial() == serial) {
            return Ok(self.cargo.remove(i));
        }
        if let Some(i) = self.freight.iter().position(|l| l.serial() == serial) {
            return Ok(self.freight.remove(i));
        }
        Err(ShipError::LotNotFound(serial))
    }

    pub fn offload_all_freight(&mut self) -> Vec<Lot> {
        std::mem::take(&mut self.freight)
    }

    // ------------------------------------------------------------------------
    // Passengers
    // ------------------------------------------------------------------------

    pub fn passengers(&self, class: PassageClass) -> &[Npc] {
        match class {
            PassageClass::High => &self.high_passengers,
            PassageClass::Mid => &self.mid_passengers,
            PassageClass::Low => &self.low_passengers,
        }
    }

    /// Staterooms not taken by high or middle passengers
    pub fn stateroom_vacancies(&self) -> u32 {
        let used = (self.high_passengers.len() + self.mid_passengers.len()) as u32;
        self.class.staterooms.saturating_sub(used)
    }

    pub fn low_berth_vacancies(&self) -> u32 {
        self.class
            .low_berths
            .saturating_sub(self.low_passengers.len() as u32)
    }

    pub fn onload_passenger(&mut self, npc: Npc, class: PassageClass) -> Result<(), ShipError> {
        let aboard = self
            .high_passengers
            .iter()
            .chain(&self.mid_passengers)
            .chain(&self.low_passengers)
            .any(|p| *p == npc);
        if aboard {
            return Err(ShipError::DuplicateItem {
                item: "passenger",
                serial: npc.serial(),
            });
        }
        let (vacant, capacity) = match class {
            PassageClass::High | PassageClass::Mid => (self.stateroom_vacancies(), "staterooms"),
            PassageClass::Low => (self.low_berth_vacancies(), "low berths"),
        };
        if vacant == 0 {
            return Err(ShipError::CapacityExceeded {
                capacity,
                required: 1,
                available: 0,
            });
        }
        match class {
            PassageClass::High => self.high_passengers.push(npc),
            PassageClass::Mid => self.mid_passengers.push(npc),
            PassageClass::Low => self.low_passengers.push(npc),
        }
        Ok(())
    }

    pub fn offload_passengers(&mut self, class: PassageClass) -> Vec<Npc> {
        match class {
            PassageClass::High => std::mem::take(&mut self.high_passengers),
            PassageClass::Mid => std::mem::take(&mut self.mid_passengers),
            PassageClass::Low => std::mem::take(&mut self.low_passengers),
        }
    }

    // ------------------------------------------------------------------------
    // Mail
    // ------------------------------------------------------------------------

    pub fn mail(&self) -> &[MailBundle] {
        &self.mail
    }

    pub fn mail_locker_size(&self) -> usize {
        self.mail_locker_size
    }

    pub fn onload_mail(&mut self, bundle: MailBundle) -> Result<(), ShipError> {
        if self.mail.len() >= self.mail_locker_size {
            return Err(ShipError::MailLockerFull);
        }
        if self.mail.iter().any(|m| m.serial() == bundle.serial()) {
            return Err(ShipError::DuplicateItem {
                item: "mail bundle",
                serial: bundle.serial(),
            });
        }
        self.mail.push(bundle);
        Ok(())
    }

    pub fn offload_mail(&mut self) -> Result<Vec<MailBundle>, ShipError> {
        if self.mail.is_empty() {
            return Err(ShipError::NoMailToOffload);
        }
        Ok(std::mem::take(&mut self.mail))
    }

    // ------------------------------------------------------------------------
    // Fuel, crew, maintenance
    // ------------------------------------------------------------------------

    pub fn fuel(&self) -> &FuelTanks {
        &self.fuel
    }

    pub fn fuel_mut(&mut self) -> &mut FuelTanks {
        &mut self.fuel
    }

    pub fn crew(&self) -> &[CrewPosition] {
        &self.crew
    }

    /// Crew members actually aboard, with their positions
    pub fn crew_members(&self) -> impl Iterator<Item = (CrewRole, &Npc)> {
        self.crew
            .iter()
            .filter_map(|p| p.member.as_ref().map(|npc| (p.role, npc)))
    }

    /// Put `npc` in the first vacant position of `role`
    pub fn hire(&mut self, role: CrewRole, npc: Npc) -> Result<(), ShipError> {
        let position = self
            .crew
            .iter_mut()
            .find(|p| p.role == role && p.member.is_none())
            .ok_or(ShipError::NoVacantPosition(role.title()))?;
        position.member = Some(npc);
        Ok(())
    }

    /// Highest level of `skill` among the crew, zero if nobody has it
    pub fn best_crew_skill(&self, skill: &str) -> u8 {
        self.crew_members()
            .map(|(_, npc)| npc.skill(skill))
            .max()
            .unwrap_or(0)
    }

    pub fn maintenance(&self) -> &MaintenanceSchedule {
        &self.maintenance
    }

    pub fn maintenance_mut(&mut self) -> &mut MaintenanceSchedule {
        &mut self.maintenance
    }

    pub fn set_maintenance(&mut self, schedule: MaintenanceSchedule) {
        self.maintenance = schedule;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ship_class::ShipRole;
    use crate::models::world::{World, WorldRecord};

    fn free_trader() -> ShipClass {
        ShipClass {
            class_name: "Free Trader".to_string(),
            role: ShipRole::Civilian,
            frequency: 1.0,
            ship_cost: 37.08,
            jump_rating: 1,
            maneuver_rating: 1,
            powerplant_rating: Some(1),
            cargo_capacity: 82,
            staterooms: 10,
            low_berths: 20,
            crew_positions: "0ACDE".to_string(),
            jump_fuel_capacity: 20,
            ops_fuel_capacity: 2,
            can_refine_fuel: false,
        }
    }

    fn world(name: &str, hex: &str, uwp: &str, importance: i32) -> World {
        World::try_from(WorldRecord {
            name: name.to_string(),
            hex: hex.to_string(),
            uwp: uwp.to_string(),
            remarks: "Hi In".to_string(),
            zone: String::new(),
            importance,
            subsector: String::new(),
        })
        .unwrap()
    }

    fn origin() -> World {
        world("Rhylanor", "2716", "A434934-F", 4)
    }

    #[test]
    fn test_new_ship_starts_fueled_and_empty() {
        let ship = Starship::new("Beowulf", "Rhylanor", free_trader());
        assert!(ship.fuel().is_full());
        assert_eq!(ship.cargo_size(), 0);
        assert_eq!(ship.destination(), "Rhylanor");
        assert_eq!(ship.crew().len(), 5);
        assert_eq!(ship.crew_members().count(), 0);
    }

    #[test]
    fn test_hold_rejects_overflow() {
        let mut ship = Starship::new("Beowulf", "Rhylanor", free_trader());
        let world = origin();
        ship.onload_lot(Lot::freight(&world, 80)).unwrap();
        let err = ship.onload_lot(Lot::speculative(&world, 3)).unwrap_err();
        assert!(matches!(err, ShipError::CapacityExceeded { available: 2, .. }));
        assert_eq!(ship.cargo_size(), 80);
        assert!(ship.is_hold_mostly_full(0.8).unwrap());
    }

    #[test]
    fn test_duplicate_lot_rejected() {
        let mut ship = Starship::new("Beowulf", "Rhylanor", free_trader());
        let lot = Lot::speculative(&origin(), 5);
        ship.onload_lot(lot.clone()).unwrap();
        assert!(matches!(
            ship.onload_lot(lot),
            Err(ShipError::DuplicateItem { item: "lot", .. })
        ));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let ship = Starship::new("Beowulf", "Rhylanor", free_trader());
        assert_eq!(
            ship.is_hold_mostly_full(1.5),
            Err(ShipError::InvalidThreshold(1.5))
        );
    }

    #[test]
    fn test_high_and_mid_share_staterooms() {
        let mut class = free_trader();
        class.staterooms = 2;
        let mut ship = Starship::new("Beowulf", "Rhylanor", class);
        ship.onload_passenger(Npc::new("A", "Rhylanor"), PassageClass::High)
            .unwrap();
        ship.onload_passenger(Npc::new("B", "Rhylanor"), PassageClass::Mid)
            .unwrap();
        let err = ship
            .onload_passenger(Npc::new("C", "Rhylanor"), PassageClass::High)
            .unwrap_err();
        assert!(matches!(
            err,
            ShipError::CapacityExceeded {
                capacity: "staterooms",
                ..
            }
        ));
        ship.onload_passenger(Npc::new("D", "Rhylanor"), PassageClass::Low)
            .unwrap();
    }

    #[test]
    fn test_invalid_passage_class() {
        let err = "steerage".parse::<PassageClass>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid passage class 'steerage'. Must be one of: high, mid, low"
        );
    }

    #[test]
    fn test_mail_locker_holds_one_bundle() {
        let mut ship = Starship::new("Beowulf", "Rhylanor", free_trader());
        assert_eq!(ship.offload_mail(), Err(ShipError::NoMailToOffload));
        let minor = world("Backwater", "2717", "C434934-7", -3);
        let hub = origin();
        ship.onload_mail(MailBundle::new(&hub, &minor).unwrap())
            .unwrap();
        assert_eq!(
            ship.onload_mail(MailBundle::new(&hub, &minor).unwrap()),
            Err(ShipError::MailLockerFull)
        );
        assert_eq!(ship.offload_mail().unwrap().len(), 1);
    }

    #[test]
    fn test_fuel_fill_prefers_jump_tank() {
        let mut tanks = FuelTanks::full(20, 2);
        tanks.burn_jump(10).unwrap();
        tanks.burn_ops(2).unwrap();
        assert_eq!(tanks.tons_needed(), 12);
        assert_eq!(tanks.fill(11), 11);
        assert_eq!(tanks.jump(), 20);
        assert_eq!(tanks.ops(), 1);
        assert!(tanks.burn_ops(2).is_err());
    }

    #[test]
    fn test_jump_without_fuel_stays_put() {
        let mut ship = Starship::new("Beowulf", "Rhylanor", free_trader());
        ship.set_course_for("Porozlo");
        ship.fuel_mut().burn_jump(15).unwrap();
        assert!(ship.jump(1).is_err());
        assert_eq!(ship.location(), "Rhylanor");
        ship.fuel_mut().fill(15);
        ship.jump(1).unwrap();
        assert_eq!(ship.location(), "Porozlo");
        assert_eq!(ship.fuel().jump(), 0);
    }

    #[test]
    fn test_hire_fills_matching_vacancy() {
        let mut ship = Starship::new("Beowulf", "Rhylanor", free_trader());
        let mut medic = Npc::new("Doc", "Rhylanor");
        medic.set_skill("medic", 3).unwrap();
        ship.hire(CrewRole::Medic, medic).unwrap();
        assert_eq!(ship.best_crew_skill("medic"), 3);
        assert_eq!(
            ship.hire(CrewRole::Medic, Npc::new("Doc 2", "Rhylanor")),
            Err(ShipError::NoVacantPosition("Medic"))
        );
        assert!(ship.hire(CrewRole::Gunner, Npc::new("G", "Rhylanor")).is_err());
    }

    #[test]
    fn test_maintenance_due_after_day_in_new_year() {
        let schedule = MaintenanceSchedule {
            annual_day: 100,
            last_year: 1104,
            needs_maintenance: false,
        };
        assert!(!schedule.is_due(TravellerDate::new(200, 1104)));
        assert!(!schedule.is_due(TravellerDate::new(99, 1105)));
        assert!(schedule.is_due(TravellerDate::new(100, 1105)));
    }
}
