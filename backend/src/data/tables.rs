//! Static game tables: starport services, trade effects, fares and rates

use crate::models::world::{StarportClass, TradeCode};

/// Base value of a speculative lot before trade-code and tech adjustments
pub const BASE_LOT_VALUE: i64 = 3000;
/// Base sale value per ton on a market before trade-code matches
pub const BASE_SALE_VALUE: i64 = 5000;
/// Added to the sale value for each selling-table match
pub const SALE_MATCH_BONUS: i64 = 1000;
/// Added to the origin value per point of origin tech level
pub const TECH_LEVEL_VALUE: i64 = 100;

/// Freight pays per ton carried
pub const FREIGHT_RATE_PER_TON: i64 = 1000;
/// Paid per mail bundle delivered
pub const MAIL_PAYMENT: i64 = 25_000;
/// Cost per ton of refined fuel
pub const REFINED_FUEL_PRICE: i64 = 500;
/// Cost per ton of unrefined fuel
pub const UNREFINED_FUEL_PRICE: i64 = 100;
/// Monthly salary per crew member per point of their key skill (minimum 1)
pub const CREW_SALARY_PER_LEVEL: i64 = 100;

/// Fares by passage class
pub const HIGH_PASSAGE_FARE: i64 = 10_000;
pub const MID_PASSAGE_FARE: i64 = 8_000;
pub const LOW_PASSAGE_FARE: i64 = 1_000;

/// 2D6 + Medic must reach this for a low passenger to survive revival
pub const LOW_PASSAGE_REVIVAL_TARGET: i32 = 8;
/// Origin importance must exceed destination importance by more than this
pub const MAIL_IMPORTANCE_MARGIN: i32 = 2;

/// Parameters of the log-normal speculative lot size distribution
pub const CARGO_LOT_MU: f64 = 2.6;
pub const CARGO_LOT_SIGMA: f64 = 0.7;

/// Price multiplier by modified flux roll, indexed from -5 through 8
pub const ACTUAL_VALUE: [f64; 14] = [
    0.4, 0.5, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2, 1.3, 1.5, 1.7, 2.0, 3.0, 4.0,
];

/// Multiplier for a flux roll plus modifiers, clamped to the table
///
/// ```
/// use t5sim_core::data::tables::actual_value_multiplier;
///
/// assert_eq!(actual_value_multiplier(0), 1.0);
/// assert_eq!(actual_value_multiplier(-9), 0.4);
/// assert_eq!(actual_value_multiplier(12), 4.0);
/// ```
pub fn actual_value_multiplier(modified_flux: i32) -> f64 {
    let index = (modified_flux.clamp(-5, 8) + 5) as usize;
    ACTUAL_VALUE[index]
}

/// What a starport offers a visiting ship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarportServices {
    pub refined_fuel: bool,
    pub unrefined_fuel: bool,
    /// Dice of hours it takes to refuel
    pub refuel_dice: u32,
    pub broker_modifier: i32,
    pub broker_fee: f64,
}

pub fn starport_services(class: StarportClass) -> StarportServices {
    match class {
        StarportClass::A => StarportServices {
            refined_fuel: true,
            unrefined_fuel: true,
            refuel_dice: 2,
            broker_modifier: 4,
            broker_fee: 0.20,
        },
        StarportClass::B => StarportServices {
            refined_fuel: true,
            unrefined_fuel: true,
            refuel_dice: 2,
            broker_modifier: 3,
            broker_fee: 0.15,
        },
        StarportClass::C => StarportServices {
            refined_fuel: false,
            unrefined_fuel: true,
            refuel_dice: 4,
            broker_modifier: 2,
            broker_fee: 0.10,
        },
        StarportClass::D => StarportServices {
            refined_fuel: false,
            unrefined_fuel: true,
            refuel_dice: 4,
            broker_modifier: 1,
            broker_fee: 0.05,
        },
        StarportClass::E | StarportClass::X => StarportServices {
            refined_fuel: false,
            unrefined_fuel: false,
            refuel_dice: 0,
            broker_modifier: 1,
            broker_fee: 0.05,
        },
    }
}

/// Effect of an origin trade code on a lot's purchase value
pub fn buying_effect(code: TradeCode) -> i64 {
    use TradeCode::*;
    match code {
        Ag | As | Hi | In | Po => -1000,
        Ba | De | Fl | Lo | Ni | Ri | Va => 1000,
        Ic | Na => 0,
    }
}

/// Market trade codes that pay a premium for goods from `origin`
pub fn selling_matches(origin: TradeCode) -> &'static [TradeCode] {
    use TradeCode::*;
    match origin {
        Ag => &[Ag, As, De, Hi, In, Ri, Va],
        As => &[As, In, Ri, Va],
        Ba => &[In],
        De => &[De],
        Fl => &[Fl, In],
        Hi => &[Hi],
        Ic => &[In],
        In => &[Ag, De, Hi, In, Ri],
        Lo => &[In],
        Na => &[As, De, Va],
        Ni => &[In],
        Po => &[Ag, Hi, In, Ri],
        Ri => &[Ag, De, Hi, In, Ri],
        Va => &[As, In, Ri, Va],
    }
}
