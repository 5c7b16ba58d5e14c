//! Simulated time: the event clock and the imperial calendar

pub mod calendar;
pub mod time;

pub use calendar::TravellerDate;
pub use time::Clock;
