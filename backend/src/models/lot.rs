//! Cargo and freight lots
//!
//! A lot remembers where it came from: its origin's tech level and trade
//! codes fix the purchase price and decide how much other markets pay.

use crate::data::tables::{
    buying_effect, selling_matches, BASE_LOT_VALUE, BASE_SALE_VALUE, SALE_MATCH_BONUS,
    TECH_LEVEL_VALUE,
};
use crate::models::world::{TradeCode, World};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Speculative cargo is bought and sold by the ship; freight is carried for
/// a fee and delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LotKind {
    Cargo,
    Freight,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lot {
    serial: Uuid,
    kind: LotKind,
    mass: u32,
    origin: String,
    origin_tech_level: u8,
    origin_trade_codes: Vec<TradeCode>,
    /// Purchase value per ton at the origin
    origin_value: i64,
}

impl PartialEq for Lot {
    fn eq(&self, other: &Self) -> bool {
        self.serial == other.serial
    }
}

impl Lot {
    fn new(origin: &World, mass: u32, kind: LotKind) -> Self {
        Self {
            serial: Uuid::new_v4(),
            kind,
            mass,
            origin: origin.name().to_string(),
            origin_tech_level: origin.tech_level(),
            origin_trade_codes: origin.trade_codes().to_vec(),
            origin_value: Self::origin_value_of(origin),
        }
    }

    pub fn speculative(origin: &World, mass: u32) -> Self {
        Self::new(origin, mass, LotKind::Cargo)
    }

    pub fn freight(origin: &World, mass: u32) -> Self {
        Self::new(origin, mass, LotKind::Freight)
    }

    pub fn serial(&self) -> Uuid {
        self.serial
    }

    pub fn kind(&self) -> LotKind {
        self.kind
    }

    pub fn mass(&self) -> u32 {
        self.mass
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn origin_value(&self) -> i64 {
        self.origin_value
    }

    /// Short id shown in logs, `<TL>-<codes> Cr<value>`
    pub fn lot_id(&self) -> String {
        let codes: Vec<&str> = self.origin_trade_codes.iter().map(|c| c.code()).collect();
        format!(
            "{}-{} Cr{}",
            crate::models::world::ehex_digit(self.origin_tech_level),
            codes.join(" "),
            self.origin_value
        )
    }

    /// Price of the whole lot at its origin
    pub fn purchase_cost(&self) -> i64 {
        self.origin_value * i64::from(self.mass)
    }

    /// Per-ton value of goods from `origin` before any broker roll
    ///
    /// `3000 + buying effects + 100 x TL`
    pub fn origin_value_of(origin: &World) -> i64 {
        let effects: i64 = origin.trade_codes().iter().copied().map(buying_effect).sum();
        BASE_LOT_VALUE + effects + TECH_LEVEL_VALUE * i64::from(origin.tech_level())
    }

    /// Per-ton sale value of this lot on `market`
    pub fn sale_value_on(&self, market: &World) -> i64 {
        Self::sale_value(self.origin_tech_level, &self.origin_trade_codes, market)
    }

    /// Per-ton sale value of goods from `origin` on `market`
    pub fn sale_value_between(origin: &World, market: &World) -> i64 {
        Self::sale_value(origin.tech_level(), origin.trade_codes(), market)
    }

    /// Expected per-ton margin of carrying goods from `origin` to `market`
    pub fn margin_between(origin: &World, market: &World) -> i64 {
        Self::sale_value_between(origin, market) - Self::origin_value_of(origin)
    }

    /// Whole-lot profitability on `market` at nominal prices (strict)
    pub fn is_profitable_on(&self, market: &World) -> bool {
        self.sale_value_on(market) * i64::from(self.mass) > self.purchase_cost()
    }

    fn sale_value(origin_tl: u8, origin_codes: &[TradeCode], market: &World) -> i64 {
        let tech_factor =
            (1.0 + 0.1 * (f64::from(origin_tl) - f64::from(market.tech_level()))).max(0.0);
        let matches = origin_codes
            .iter()
            .flat_map(|code| selling_matches(*code).iter())
            .filter(|wanted| market.has_trade_code(**wanted))
            .count() as i64;
        let base = BASE_SALE_VALUE + SALE_MATCH_BONUS * matches;
        (tech_factor * base as f64).round() as i64
    }
}
