//! Worlds of the subsector map
//!
//! A world is identified by name and placed on a hex grid. Its Universal
//! World Profile (UWP) drives starport services, freight volume and
//! passenger traffic, and its trade codes drive cargo prices.

use crate::data::tables::{starport_services, StarportServices, CARGO_LOT_MU, CARGO_LOT_SIGMA};
use crate::data::DataError;
use crate::models::lot::Lot;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Trade codes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradeCode {
    Ag,
    As,
    Ba,
    De,
    Fl,
    Hi,
    Ic,
    In,
    Lo,
    Na,
    Ni,
    Po,
    Ri,
    Va,
}

impl TradeCode {
    pub const ALL: [TradeCode; 14] = [
        TradeCode::Ag,
        TradeCode::As,
        TradeCode::Ba,
        TradeCode::De,
        TradeCode::Fl,
        TradeCode::Hi,
        TradeCode::Ic,
        TradeCode::In,
        TradeCode::Lo,
        TradeCode::Na,
        TradeCode::Ni,
        TradeCode::Po,
        TradeCode::Ri,
        TradeCode::Va,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            TradeCode::Ag => "Ag",
            TradeCode::As => "As",
            TradeCode::Ba => "Ba",
            TradeCode::De => "De",
            TradeCode::Fl => "Fl",
            TradeCode::Hi => "Hi",
            TradeCode::Ic => "Ic",
            TradeCode::In => "In",
            TradeCode::Lo => "Lo",
            TradeCode::Na => "Na",
            TradeCode::Ni => "Ni",
            TradeCode::Po => "Po",
            TradeCode::Ri => "Ri",
            TradeCode::Va => "Va",
        }
    }

    /// Parse a two-letter remark; other remarks (Cp, Ph...) are not trade codes
    pub fn parse(remark: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.code() == remark)
    }
}

impl fmt::Display for TradeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// UWP
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StarportClass {
    A,
    B,
    C,
    D,
    E,
    X,
}

impl StarportClass {
    pub const ALL: [StarportClass; 6] = [
        StarportClass::A,
        StarportClass::B,
        StarportClass::C,
        StarportClass::D,
        StarportClass::E,
        StarportClass::X,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(StarportClass::A),
            'B' => Some(StarportClass::B),
            'C' => Some(StarportClass::C),
            'D' => Some(StarportClass::D),
            'E' => Some(StarportClass::E),
            'X' => Some(StarportClass::X),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            StarportClass::A => 'A',
            StarportClass::B => 'B',
            StarportClass::C => 'C',
            StarportClass::D => 'D',
            StarportClass::E => 'E',
            StarportClass::X => 'X',
        }
    }
}

/// Value of an extended-hex digit (0-9 then A-Z, skipping nothing)
pub fn ehex_value(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'A'..='Z' => Some(c as u8 - b'A' + 10),
        _ => None,
    }
}

pub fn ehex_digit(value: u8) -> char {
    match value {
        0..=9 => (b'0' + value) as char,
        10..=35 => (b'A' + value - 10) as char,
        _ => '?',
    }
}

/// Universal World Profile, e.g. `A434934-F`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uwp {
    pub starport: StarportClass,
    pub size: u8,
    pub atmosphere: u8,
    pub hydrographics: u8,
    pub population: u8,
    pub government: u8,
    pub law_level: u8,
    pub tech_level: u8,
}

impl FromStr for Uwp {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &'static str| DataError::InvalidUwp {
            uwp: s.to_string(),
            reason,
        };
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != 9 {
            return Err(invalid("expected 9 characters"));
        }
        if chars[7] != '-' {
            return Err(invalid("expected '-' before tech level"));
        }
        let starport =
            StarportClass::from_char(chars[0]).ok_or_else(|| invalid("unknown starport class"))?;
        let digit = |i: usize| ehex_value(chars[i]).ok_or_else(|| invalid("bad eHex digit"));
        Ok(Uwp {
            starport,
            size: digit(1)?,
            atmosphere: digit(2)?,
            hydrographics: digit(3)?,
            population: digit(4)?,
            government: digit(5)?,
            law_level: digit(6)?,
            tech_level: digit(8)?,
        })
    }
}

impl fmt::Display for Uwp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}{}{}-{}",
            self.starport.letter(),
            ehex_digit(self.size),
            ehex_digit(self.atmosphere),
            ehex_digit(self.hydrographics),
            ehex_digit(self.population),
            ehex_digit(self.government),
            ehex_digit(self.law_level),
            ehex_digit(self.tech_level),
        )
    }
}

// ============================================================================
// Hex grid
// ============================================================================

/// Map position as column and row, written `CCRR`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub col: i32,
    pub row: i32,
}

impl Hex {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Axial coordinates of an even-q offset hex
    fn axial(&self) -> (i32, i32) {
        let q = self.col;
        let r = self.row - (self.col + (self.col & 1)) / 2;
        (q, r)
    }

    /// Distance in parsecs
    ///
    /// ```
    /// use t5sim_core::Hex;
    ///
    /// let rhylanor: Hex = "2716".parse().unwrap();
    /// assert_eq!(rhylanor.distance(&"2717".parse().unwrap()), 1);
    /// assert_eq!(rhylanor.distance(&rhylanor), 0);
    /// ```
    pub fn distance(&self, other: &Hex) -> u32 {
        let (q1, r1) = self.axial();
        let (q2, r2) = other.axial();
        let dq = q1 - q2;
        let dr = r1 - r2;
        ((dq.abs() + dr.abs() + (dq + dr).abs()) / 2) as u32
    }
}

impl FromStr for Hex {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 4 || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(DataError::InvalidHex(s.to_string()));
        }
        let col = s[..2]
            .parse()
            .map_err(|_| DataError::InvalidHex(s.to_string()))?;
        let row = s[2..]
            .parse()
            .map_err(|_| DataError::InvalidHex(s.to_string()))?;
        Ok(Hex { col, row })
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.col, self.row)
    }
}

// ============================================================================
// World
// ============================================================================

/// A world as written in the map file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldRecord {
    pub name: String,
    pub hex: String,
    pub uwp: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub importance: i32,
    #[serde(default)]
    pub subsector: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    name: String,
    hex: Hex,
    uwp: Uwp,
    trade_codes: Vec<TradeCode>,
    remarks: Vec<String>,
    zone: String,
    importance: i32,
    subsector: String,
}

impl TryFrom<WorldRecord> for World {
    type Error = DataError;

    fn try_from(record: WorldRecord) -> Result<Self, Self::Error> {
        let remarks: Vec<String> = record
            .remarks
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let mut trade_codes: Vec<TradeCode> =
            remarks.iter().filter_map(|r| TradeCode::parse(r)).collect();
        trade_codes.sort();
        trade_codes.dedup();
        Ok(World {
            hex: record.hex.parse()?,
            uwp: record.uwp.parse()?,
            name: record.name,
            trade_codes,
            remarks,
            zone: record.zone,
            importance: record.importance,
            subsector: record.subsector,
        })
    }
}

impl World {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hex(&self) -> Hex {
        self.hex
    }

    pub fn uwp(&self) -> &Uwp {
        &self.uwp
    }

    pub fn starport(&self) -> StarportClass {
        self.uwp.starport
    }

    pub fn services(&self) -> StarportServices {
        starport_services(self.uwp.starport)
    }

    pub fn population(&self) -> u8 {
        self.uwp.population
    }

    pub fn tech_level(&self) -> u8 {
        self.uwp.tech_level
    }

    pub fn trade_codes(&self) -> &[TradeCode] {
        &self.trade_codes
    }

    pub fn has_trade_code(&self, code: TradeCode) -> bool {
        self.trade_codes.contains(&code)
    }

    pub fn remarks(&self) -> &[String] {
        &self.remarks
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn importance(&self) -> i32 {
        self.importance
    }

    pub fn subsector(&self) -> &str {
        &self.subsector
    }

    /// `Name (Subsector HHRR)` as shown in reports
    pub fn full_name(&self) -> String {
        if self.subsector.is_empty() {
            format!("{} ({})", self.name, self.hex)
        } else {
            format!("{} ({} {})", self.name, self.subsector, self.hex)
        }
    }

    pub fn distance_to(&self, other: &World) -> u32 {
        self.hex.distance(&other.hex)
    }

    /// Roll the mass of one freight lot on offer here
    ///
    /// `(flux + population)`, doubled when the world carries any trade code,
    /// plus the shipper's Liaison skill, never below zero.
    pub fn freight_lot_mass(&self, liaison: u8, rng: &mut RngManager) -> u32 {
        let base = rng.flux() + i32::from(self.population());
        let multiplier = if self.trade_codes.is_empty() { 1 } else { 2 };
        (base * multiplier + i32::from(liaison)).max(0) as u32
    }

    /// Roll high passengers wanting passage
    pub fn high_passenger_availability(&self, steward: u8, rng: &mut RngManager) -> u32 {
        self.passenger_roll(-4, steward, rng)
    }

    /// Roll middle passengers wanting passage
    pub fn mid_passenger_availability(&self, admin: u8, rng: &mut RngManager) -> u32 {
        self.passenger_roll(-2, admin, rng)
    }

    /// Roll low passengers wanting passage
    pub fn low_passenger_availability(&self, streetwise: u8, rng: &mut RngManager) -> u32 {
        self.passenger_roll(0, streetwise, rng)
    }

    fn passenger_roll(&self, dm: i32, skill: u8, rng: &mut RngManager) -> u32 {
        (rng.flux() + i32::from(self.population()) + dm + i32::from(skill)).max(0) as u32
    }

    /// Speculative lots for sale, summing to exactly `max_total_tons`
    ///
    /// Lot masses are log-normal, clamped to `1..=max_lot_size`, and the last
    /// lot is trimmed so the total comes out exact.
    pub fn generate_speculative_cargo(
        &self,
        rng: &mut RngManager,
        max_total_tons: u32,
        max_lot_size: u32,
    ) -> Vec<Lot> {
        let max_lot_size = max_lot_size.max(1);
        let mut lots = Vec::new();
        let mut remaining = max_total_tons;
        while remaining > 0 {
            let sampled = rng.lognormal(CARGO_LOT_MU, CARGO_LOT_SIGMA).round();
            let mass = (sampled as u32).clamp(1, max_lot_size).min(remaining);
            lots.push(Lot::speculative(self, mass));
            remaining -= mass;
        }
        lots
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.hex, self.name, self.uwp)
    }
}
