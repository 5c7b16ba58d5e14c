//! Imperial calendar
//!
//! A year has 365 days. Day 1 is the Holiday and belongs to no month; the
//! remaining 364 days form 13 months of 28 days, so month `m` starts on day
//! `2 + 28 * (m - 1)`. Dates print as `DDD-YYYY`.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DAYS_PER_YEAR: u32 = 365;
pub const DAYS_PER_MONTH: u32 = 28;
pub const MONTHS_PER_YEAR: u32 = 13;
/// Day-of-year of the Holiday
pub const HOLIDAY: u32 = 1;

/// A day within a year of the imperial calendar
///
/// # Example
/// ```
/// use t5sim_core::TravellerDate;
///
/// let date = TravellerDate::new(360, 1104);
/// assert_eq!(date.to_string(), "360-1104");
///
/// let later = date.advanced_by(7.5);
/// assert_eq!(later.to_string(), "002-1105");
/// assert_eq!(later.month(), Some(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TravellerDate {
    year: u32,
    day: u32,
}

impl TravellerDate {
    /// # Panics
    /// Panics if `day` is outside `1..=365`
    pub fn new(day: u32, year: u32) -> Self {
        assert!(
            (1..=DAYS_PER_YEAR).contains(&day),
            "day of year must be within 1..=365"
        );
        Self { year, day }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    /// Date reached after `days` of simulated time (fractions are dropped)
    pub fn advanced_by(&self, days: f64) -> Self {
        let whole = if days.is_finite() && days > 0.0 {
            days.floor() as u64
        } else {
            0
        };
        let ordinal = u64::from(self.day - 1) + whole;
        let years = ordinal / u64::from(DAYS_PER_YEAR);
        let day = (ordinal % u64::from(DAYS_PER_YEAR)) as u32 + 1;
        Self {
            year: self.year + years as u32,
            day,
        }
    }

    /// Month number (1-13), or `None` on the Holiday
    pub fn month(&self) -> Option<u32> {
        if self.day == HOLIDAY {
            None
        } else {
            Some((self.day - 2) / DAYS_PER_MONTH + 1)
        }
    }

    pub fn is_holiday(&self) -> bool {
        self.day == HOLIDAY
    }

    pub fn is_month_start(&self) -> bool {
        self.day >= 2 && (self.day - 2) % DAYS_PER_MONTH == 0
    }

    /// Days until the next first-of-month, zero when today is one
    ///
    /// After month 13 the next month start is day 2 of the following year.
    ///
    /// ```
    /// use t5sim_core::TravellerDate;
    ///
    /// assert_eq!(TravellerDate::new(10, 1105).days_until_next_month(), 20);
    /// assert_eq!(TravellerDate::new(350, 1105).days_until_next_month(), 17);
    /// assert_eq!(TravellerDate::new(30, 1105).days_until_next_month(), 0);
    /// ```
    pub fn days_until_next_month(&self) -> u32 {
        if self.is_month_start() {
            return 0;
        }
        if self.day == HOLIDAY {
            return 1;
        }
        let month = (self.day - 2) / DAYS_PER_MONTH + 1;
        let next_start = 2 + DAYS_PER_MONTH * month;
        if next_start > DAYS_PER_YEAR {
            (DAYS_PER_YEAR - self.day) + 2
        } else {
            next_start - self.day
        }
    }

    /// Days from today until the month start after today
    pub fn days_until_following_month(&self) -> u32 {
        self.advanced_by(1.0).days_until_next_month() + 1
    }
}

impl fmt::Display for TravellerDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}-{}", self.day, self.year)
    }
}
