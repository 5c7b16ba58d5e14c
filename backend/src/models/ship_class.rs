//! Starship designs and crew positions

use crate::data::DataError;
use crate::models::world::World;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Who operates a class of ship
///
/// Military and specialized ships answer to a patron who covers their
/// shortfalls; civilian ships go broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipRole {
    Civilian,
    Military,
    Specialized,
}

impl ShipRole {
    pub const ALL: [ShipRole; 3] = [ShipRole::Civilian, ShipRole::Military, ShipRole::Specialized];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShipRole::Civilian => "civilian",
            ShipRole::Military => "military",
            ShipRole::Specialized => "specialized",
        }
    }

    pub fn has_patron(&self) -> bool {
        !matches!(self, ShipRole::Civilian)
    }
}

impl fmt::Display for ShipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipRole {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "civilian" => Ok(ShipRole::Civilian),
            "military" => Ok(ShipRole::Military),
            "specialized" => Ok(ShipRole::Specialized),
            other => Err(DataError::UnknownRole(other.to_string())),
        }
    }
}

/// Crew position, encoded as one character in a ship's crew string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CrewRole {
    Captain,
    Pilot,
    Astrogator,
    Engineer,
    Medic,
    Steward,
    Freightmaster,
    Sensop,
    Cook,
    Gunner,
    AbleSpacer,
    Spacer,
}

impl CrewRole {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '0' => Some(CrewRole::Captain),
            'A' => Some(CrewRole::Pilot),
            'B' => Some(CrewRole::Astrogator),
            'C' => Some(CrewRole::Engineer),
            'D' => Some(CrewRole::Medic),
            'E' => Some(CrewRole::Steward),
            'F' => Some(CrewRole::Freightmaster),
            'G' => Some(CrewRole::Sensop),
            'N' => Some(CrewRole::Cook),
            'T' => Some(CrewRole::Gunner),
            'Y' => Some(CrewRole::AbleSpacer),
            'Z' => Some(CrewRole::Spacer),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            CrewRole::Captain => '0',
            CrewRole::Pilot => 'A',
            CrewRole::Astrogator => 'B',
            CrewRole::Engineer => 'C',
            CrewRole::Medic => 'D',
            CrewRole::Steward => 'E',
            CrewRole::Freightmaster => 'F',
            CrewRole::Sensop => 'G',
            CrewRole::Cook => 'N',
            CrewRole::Gunner => 'T',
            CrewRole::AbleSpacer => 'Y',
            CrewRole::Spacer => 'Z',
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CrewRole::Captain => "Captain",
            CrewRole::Pilot => "Pilot",
            CrewRole::Astrogator => "Astrogator",
            CrewRole::Engineer => "Engineer",
            CrewRole::Medic => "Medic",
            CrewRole::Steward => "Steward",
            CrewRole::Freightmaster => "Freightmaster",
            CrewRole::Sensop => "Sensop",
            CrewRole::Cook => "Cook",
            CrewRole::Gunner => "Gunner",
            CrewRole::AbleSpacer => "Able Spacer",
            CrewRole::Spacer => "Spacer",
        }
    }

    /// The skill that sets this position's pay
    pub fn key_skill(&self) -> &'static str {
        match self {
            CrewRole::Captain => "leader",
            CrewRole::Pilot => "pilot",
            CrewRole::Astrogator => "astrogator",
            CrewRole::Engineer => "engineer",
            CrewRole::Medic => "medic",
            CrewRole::Steward | CrewRole::Cook => "steward",
            CrewRole::Freightmaster => "liaison",
            CrewRole::Sensop => "sensors",
            CrewRole::Gunner => "gunner",
            CrewRole::AbleSpacer | CrewRole::Spacer => "vacc suit",
        }
    }
}

/// A ship design as loaded from the ship classes file
///
/// Ship cost is in MCr. Every field except `powerplant_rating` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipClass {
    pub class_name: String,
    pub role: ShipRole,
    /// Share of its role's ships built to this design
    pub frequency: f64,
    pub ship_cost: f64,
    pub jump_rating: u32,
    pub maneuver_rating: u32,
    #[serde(default)]
    pub powerplant_rating: Option<u32>,
    pub cargo_capacity: u32,
    pub staterooms: u32,
    pub low_berths: u32,
    pub crew_positions: String,
    pub jump_fuel_capacity: u32,
    pub ops_fuel_capacity: u32,
    pub can_refine_fuel: bool,
}

impl ShipClass {
    /// Crew positions in the order they appear in the crew string
    pub fn crew_roles(&self) -> Vec<CrewRole> {
        self.crew_positions
            .chars()
            .filter_map(CrewRole::from_code)
            .collect()
    }

    pub fn powerplant(&self) -> u32 {
        self.powerplant_rating.unwrap_or(self.maneuver_rating)
    }

    /// Jump, maneuver and powerplant ratings, e.g. `"211"`
    pub fn usp(&self) -> String {
        format!(
            "{}{}{}",
            self.jump_rating,
            self.maneuver_rating,
            self.powerplant()
        )
    }

    /// Annual maintenance in Credits (one thousandth of the purchase price)
    pub fn maintenance_cost(&self) -> i64 {
        (self.ship_cost * 1000.0).round() as i64
    }

    /// Tons of jump fuel burned per parsec
    pub fn jump_fuel_per_parsec(&self) -> u32 {
        if self.jump_rating == 0 {
            0
        } else {
            self.jump_fuel_capacity / self.jump_rating
        }
    }

    /// Whether `world` sells fuel this design can burn
    ///
    /// Ships with fuel purifiers take unrefined fuel; the rest need a
    /// starport selling refined fuel.
    pub fn can_refuel_at(&self, world: &World) -> bool {
        let services = world.services();
        services.refined_fuel || (self.can_refine_fuel && services.unrefined_fuel)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if let Some(code) = self
            .crew_positions
            .chars()
            .find(|c| CrewRole::from_code(*c).is_none())
        {
            return Err(DataError::UnknownCrewCode {
                class_name: self.class_name.clone(),
                code,
            });
        }
        if !(0.0..=1.0).contains(&self.frequency) || self.ship_cost < 0.0 {
            return Err(DataError::InvalidShipClass {
                class_name: self.class_name.clone(),
                reason: "frequency must lie in [0, 1] and cost must not be negative",
            });
        }
        Ok(())
    }
}

/// Check that the frequencies within each role sum to 1.00
///
/// Sums are compared after rounding to two decimals. All offending roles are
/// reported together, sorted by role.
pub fn validate_role_frequencies(classes: &[ShipClass]) -> Result<(), DataError> {
    let mut totals: BTreeMap<ShipRole, f64> = BTreeMap::new();
    for class in classes {
        *totals.entry(class.role).or_insert(0.0) += class.frequency;
    }
    let problems: Vec<String> = totals
        .iter()
        .filter(|(_, total)| ((**total * 100.0).round() - 100.0).abs() > f64::EPSILON)
        .map(|(role, total)| {
            format!("role '{}' sums to {:.2} (expected 1.00)", role, total)
        })
        .collect();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(DataError::FrequencyTotals(problems.join("; ")))
    }
}

/// Restrict a catalogue to the given roles (all roles when `roles` is empty)
///
/// # Errors
/// `DataError::NoShipsForRole` when a requested role has no classes
pub fn filter_by_roles(classes: &[ShipClass], roles: &[ShipRole]) -> Result<Vec<ShipClass>, DataError> {
    if roles.is_empty() {
        return Ok(classes.to_vec());
    }
    for role in roles {
        if !classes.iter().any(|c| c.role == *role) {
            return Err(DataError::NoShipsForRole(role.to_string()));
        }
    }
    Ok(classes
        .iter()
        .filter(|c| roles.contains(&c.role))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, role: ShipRole, frequency: f64) -> ShipClass {
        ShipClass {
            class_name: name.to_string(),
            role,
            frequency,
            ship_cost: 37.08,
            jump_rating: 1,
            maneuver_rating: 1,
            powerplant_rating: None,
            cargo_capacity: 82,
            staterooms: 10,
            low_berths: 20,
            crew_positions: "0ACDE".to_string(),
            jump_fuel_capacity: 20,
            ops_fuel_capacity: 2,
            can_refine_fuel: false,
        }
    }

    #[test]
    fn test_crew_string_decodes() {
        let c = class("Free Trader", ShipRole::Civilian, 1.0);
        assert_eq!(
            c.crew_roles(),
            vec![
                CrewRole::Captain,
                CrewRole::Pilot,
                CrewRole::Engineer,
                CrewRole::Medic,
                CrewRole::Steward
            ]
        );
        assert_eq!(c.usp(), "111");
        assert_eq!(c.maintenance_cost(), 37_080);
        assert_eq!(c.jump_fuel_per_parsec(), 20);
    }

    #[test]
    fn test_unknown_crew_code_rejected() {
        let mut c = class("Odd", ShipRole::Civilian, 1.0);
        c.crew_positions = "0AQ".to_string();
        assert!(matches!(
            c.validate(),
            Err(DataError::UnknownCrewCode { code: 'Q', .. })
        ));
    }

    #[test]
    fn test_frequency_error_names_role_and_sum() {
        let classes = vec![
            class("A", ShipRole::Civilian, 0.5),
            class("B", ShipRole::Civilian, 0.4),
            class("C", ShipRole::Military, 1.0),
        ];
        let err = validate_role_frequencies(&classes).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Frequency totals invalid: role 'civilian' sums to 0.90 (expected 1.00)"
        );
    }

    #[test]
    fn test_frequencies_tolerate_float_noise() {
        let classes = vec![
            class("A", ShipRole::Civilian, 0.1),
            class("B", ShipRole::Civilian, 0.2),
            class("C", ShipRole::Civilian, 0.7),
        ];
        assert!(validate_role_frequencies(&classes).is_ok());
    }

    #[test]
    fn test_filter_missing_role() {
        let classes = vec![class("A", ShipRole::Civilian, 1.0)];
        let err = filter_by_roles(&classes, &[ShipRole::Military]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No ships with role 'military' found in ship classes file"
        );
        assert_eq!(filter_by_roles(&classes, &[]).unwrap().len(), 1);
    }
}
