//! Starship agents
//!
//! A [`StarshipAgent`] couples one ship with the company that owns it and
//! runs two tasks on the simulation clock:
//!
//! - **trading**: the voyage state machine (port business, refueling,
//!   jump, arrival, annual maintenance)
//! - **payroll**: pays the crew on the first day of every month
//!
//! Both tasks are resumed by the orchestrator through
//! [`StarshipAgent::resume_trading`] and [`StarshipAgent::resume_payroll`],
//! which perform whatever is due at the current time and answer with the
//! delay until the next wake-up.
//!
//! Domain failures inside an agent (a lot that does not fit, no mail on a
//! route, a jump without fuel) are logged and absorbed. Only data lookup
//! failures propagate, since they mean the catalogue itself is inconsistent.

mod trading;
mod upkeep;

use crate::core::TravellerDate;
use crate::data::{DataError, GameContext};
use crate::finance::{format_credits, Company};
use crate::models::{Event, EventLog, Starship, StarshipState};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// Counterparty accounts on every company's books
pub const FUEL_DEPOT: &str = "Starport Fuel Depot";
pub const CREW_PAYROLL: &str = "Crew Payroll";
pub const SHIPYARD: &str = "Shipyard Maintenance";
pub const CREW_PROFIT_SHARE: &str = "Crew Profit Share";
pub const PATRON: &str = "Patron";
pub const CARGO_MARKET: &str = "Cargo Market";
pub const CARGO_BROKERS: &str = "Cargo Brokers";
pub const FREIGHT_SHIPPERS: &str = "Freight Shippers";
pub const PASSENGER_FARES: &str = "Passenger Fares";
pub const MAIL_SERVICE: &str = "Imperial Mail Service";

/// Wake-up interval of a ship that has gone broke
pub const BROKE_IDLE_DAYS: f64 = 1.0;

/// Tunable trading behaviour shared by all ships in a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingPolicy {
    /// Hold fill fraction at which a ship stops looking for freight
    pub freight_threshold: f64,
    /// Consecutive fruitless freight searches before departing anyway
    pub max_freight_attempts: u32,
    /// Credit granted by a patron to military and specialized ships
    pub patron_bailout: i64,
    /// Days spent in the yard for annual maintenance
    pub maintenance_days: f64,
    /// Share of annual profit paid to the crew at maintenance
    pub crew_profit_share: f64,
}

impl Default for TradingPolicy {
    fn default() -> Self {
        Self {
            freight_threshold: 0.8,
            max_freight_attempts: 4,
            patron_bailout: 1_000_000,
            maintenance_days: 14.0,
            crew_profit_share: 0.10,
        }
    }
}

impl TradingPolicy {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.freight_threshold) {
            return Err(format!(
                "freight_threshold must be between 0 and 1, got {}",
                self.freight_threshold
            ));
        }
        if self.max_freight_attempts == 0 {
            return Err("max_freight_attempts must be at least 1".to_string());
        }
        if self.patron_bailout <= 0 {
            return Err("patron_bailout must be positive".to_string());
        }
        if !(self.maintenance_days.is_finite() && self.maintenance_days > 0.0) {
            return Err("maintenance_days must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.crew_profit_share) {
            return Err("crew_profit_share must be between 0 and 1".to_string());
        }
        Ok(())
    }
}

/// Shared simulation state lent to an agent while it is resumed
pub struct AgentContext<'a> {
    pub game: &'a GameContext,
    pub rng: &'a mut RngManager,
    pub events: &'a mut EventLog,
    /// Calendar date at simulated time zero
    pub start_date: TravellerDate,
}

impl AgentContext<'_> {
    pub fn date_at(&self, now: f64) -> TravellerDate {
        self.start_date.advanced_by(now)
    }
}

/// One ship, its owning company and its trading progress
#[derive(Debug, Clone)]
pub struct StarshipAgent {
    ship: Starship,
    company: Company,
    policy: TradingPolicy,
    state: StarshipState,
    /// False until the first resume, which only performs the initial state
    started: bool,
    broke: bool,
    speculate_cargo: bool,
    voyage_count: u32,
    freight_attempts: u32,
    freight_loaded_this_visit: bool,
    /// Cash balance at the last maintenance (or at start)
    last_year_balance: i64,
    bailouts: u32,
    cargo_sales: u32,
}

impl StarshipAgent {
    /// A docked agent; the ship is registered to the company
    pub fn new(
        mut ship: Starship,
        company: Company,
        policy: TradingPolicy,
        speculate_cargo: bool,
    ) -> Self {
        ship.set_owner(company.serial());
        Self {
            last_year_balance: company.balance(),
            ship,
            company,
            policy,
            state: StarshipState::Docked,
            started: false,
            broke: false,
            speculate_cargo,
            voyage_count: 0,
            freight_attempts: 0,
            freight_loaded_this_visit: false,
            bailouts: 0,
            cargo_sales: 0,
        }
    }

    /// Start from `state` instead of docked
    pub fn with_state(mut self, state: StarshipState) -> Self {
        self.state = state;
        self
    }

    pub fn name(&self) -> &str {
        self.ship.name()
    }

    pub fn ship(&self) -> &Starship {
        &self.ship
    }

    pub fn ship_mut(&mut self) -> &mut Starship {
        &mut self.ship
    }

    pub fn company(&self) -> &Company {
        &self.company
    }

    pub fn company_mut(&mut self) -> &mut Company {
        &mut self.company
    }

    pub fn policy(&self) -> &TradingPolicy {
        &self.policy
    }

    pub fn balance(&self) -> i64 {
        self.company.balance()
    }

    pub fn state(&self) -> StarshipState {
        self.state
    }

    pub fn is_broke(&self) -> bool {
        self.broke
    }

    pub fn speculates(&self) -> bool {
        self.speculate_cargo
    }

    pub fn voyage_count(&self) -> u32 {
        self.voyage_count
    }

    pub fn bailouts(&self) -> u32 {
        self.bailouts
    }

    pub fn cargo_sales(&self) -> u32 {
        self.cargo_sales
    }

    pub fn last_year_balance(&self) -> i64 {
        self.last_year_balance
    }

    /// One-line status, as printed in verbose mode
    pub fn status_line(&self, date: TravellerDate) -> String {
        format!(
            "{} | {} | {} @ {} -> {} | {} | {}",
            date,
            self.ship.name(),
            self.state,
            self.ship.location(),
            self.ship.destination(),
            format_credits(self.company.balance()),
            self.state.describe(),
        )
    }

    /// Resume the trading task at `now`
    ///
    /// Moves to the next state (unless this is the first resume), performs
    /// that state's action and returns how long the ship stays in it. A broke
    /// ship does nothing and asks to be woken again after
    /// [`BROKE_IDLE_DAYS`].
    pub fn resume_trading(
        &mut self,
        now: f64,
        cx: &mut AgentContext<'_>,
    ) -> Result<f64, DataError> {
        if self.broke {
            return Ok(BROKE_IDLE_DAYS);
        }
        if self.started {
            self.advance_state(now, cx);
        } else {
            self.started = true;
        }
        let duration = self.perform_state_action(now, cx)?;
        debug!("{}", self.status_line(cx.date_at(now)));
        Ok(duration)
    }

    /// Resume the payroll task at `now`
    ///
    /// Pays the crew when `now` falls on a month start and returns the delay
    /// to the next month start. Returns `None` once the ship is broke, which
    /// ends the task.
    pub fn resume_payroll(&mut self, now: f64, cx: &mut AgentContext<'_>) -> Option<f64> {
        if self.broke {
            return None;
        }
        let date = cx.date_at(now);
        if !date.is_month_start() {
            return Some(f64::from(date.days_until_next_month()));
        }
        self.pay_crew(now, date, cx);
        if self.broke {
            None
        } else {
            Some(f64::from(date.days_until_following_month()))
        }
    }

    fn advance_state(&mut self, now: f64, cx: &mut AgentContext<'_>) {
        let current = self.state;
        let next = match current {
            StarshipState::LoadingFreight if self.keep_loading_freight() => return,
            StarshipState::SellingCargo if self.maintenance_due(cx.date_at(now)) => {
                StarshipState::Maintenance
            }
            state => state.next(),
        };
        cx.events.log(Event::StateChanged {
            day: now,
            ship: self.ship.name().to_string(),
            from: current,
            to: next,
        });
        self.state = next;
    }

    fn perform_state_action(
        &mut self,
        now: f64,
        cx: &mut AgentContext<'_>,
    ) -> Result<f64, DataError> {
        match self.state {
            StarshipState::Docked | StarshipState::Departing | StarshipState::Arriving => {}
            StarshipState::Offloading => self.offload(now, cx)?,
            StarshipState::SellingCargo => self.sell_cargo(now, cx)?,
            StarshipState::LoadingFreight => self.load_freight(now, cx)?,
            StarshipState::LoadingCargo => self.load_cargo(now, cx)?,
            StarshipState::LoadingMail => self.load_mail(now, cx)?,
            StarshipState::LoadingPassengers => self.load_passengers(now, cx)?,
            StarshipState::LoadingFuel => return self.refuel(now, cx),
            StarshipState::ManeuveringToJump | StarshipState::ManeuveringToPort => {
                self.maneuver()
            }
            StarshipState::Jumping => self.jump(now, cx)?,
            StarshipState::Maintenance => {
                self.perform_maintenance(now, cx);
                return Ok(self.policy.maintenance_days);
            }
        }
        Ok(self.state.nominal_duration())
    }

    /// Credit cash from an outside account
    fn credit(&mut self, now: f64, from: &str, amount: i64, memo: &str) {
        if let Err(err) = self.company.receive(now, from, amount, memo) {
            warn!(ship = self.ship.name(), %err, "credit from {} rejected", from);
        }
    }
}
