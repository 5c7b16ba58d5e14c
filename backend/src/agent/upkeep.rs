//! Running costs: fuel, crew payroll, annual maintenance, and what happens
//! when the company cannot pay

use super::{AgentContext, StarshipAgent, CREW_PAYROLL, CREW_PROFIT_SHARE, FUEL_DEPOT, PATRON, SHIPYARD};
use crate::core::TravellerDate;
use crate::data::tables::{CREW_SALARY_PER_LEVEL, REFINED_FUEL_PRICE, UNREFINED_FUEL_PRICE};
use crate::data::DataError;
use crate::finance::format_credits;
use crate::models::{Event, World};
use tracing::{debug, info, warn};

impl StarshipAgent {
    /// Cheapest fuel this ship can burn at `world`, with whether it is refined
    pub fn fuel_price_at(&self, world: &World) -> Option<(i64, bool)> {
        let services = world.services();
        if self.ship.class().can_refine_fuel && services.unrefined_fuel {
            Some((UNREFINED_FUEL_PRICE, false))
        } else if services.refined_fuel {
            Some((REFINED_FUEL_PRICE, true))
        } else {
            None
        }
    }

    /// Cash needed to top off the tanks at `world`
    pub(super) fn fuel_reserve(&self, world: &World) -> i64 {
        self.fuel_price_at(world)
            .map(|(price, _)| price * i64::from(self.ship.fuel().tons_needed()))
            .unwrap_or(0)
    }

    /// Refuel at the local depot and return how long it took
    ///
    /// Takes the starport's refuel dice in hours whether or not fuel is
    /// bought. Tanks are topped off when affordable, otherwise as many tons
    /// as the cash covers. If not even one ton is affordable the shortfall
    /// goes to [`Self::cover_shortfall`].
    pub(super) fn refuel(&mut self, now: f64, cx: &mut AgentContext<'_>) -> Result<f64, DataError> {
        let game = cx.game;
        let world = game.world(self.ship.location())?;
        let duration = f64::from(cx.rng.roll_dice(world.services().refuel_dice)) / 24.0;

        let Some((price, refined)) = self.fuel_price_at(world) else {
            debug!(ship = self.ship.name(), world = world.name(), "no compatible fuel for sale");
            return Ok(duration);
        };
        let needed = self.ship.fuel().tons_needed();
        if needed == 0 {
            return Ok(duration);
        }

        let full_cost = price * i64::from(needed);
        if self.company.balance() < price
            && !self.cover_shortfall(now, cx, "fuel", full_cost)
        {
            return Ok(duration);
        }

        let tons = if self.company.can_afford(full_cost) {
            needed
        } else {
            (self.company.balance() / price) as u32
        };
        let cost = price * i64::from(tons);
        let memo = format!(
            "Refuel {} tons {} fuel at {}",
            tons,
            if refined { "refined" } else { "unrefined" },
            world.name()
        );
        if let Err(err) = self.company.pay(now, FUEL_DEPOT, cost, &memo) {
            warn!(ship = self.ship.name(), %err, "fuel purchase refused");
            return Ok(duration);
        }
        self.ship.fuel_mut().fill(tons);
        if tons < needed {
            info!(ship = self.ship.name(), "refueled partially: {} of {} tons", tons, needed);
        }
        cx.events.log(Event::Refueled {
            day: now,
            ship: self.ship.name().to_string(),
            world: world.name().to_string(),
            tons,
            cost,
            refined,
            partial: tons < needed,
        });
        Ok(duration)
    }

    /// Pay every crew member aboard their monthly salary
    ///
    /// Each position earns `CREW_SALARY_PER_LEVEL` per level of its key
    /// skill, at least one level's worth. A ship without crew pays nothing.
    pub(super) fn pay_crew(&mut self, now: f64, date: TravellerDate, cx: &mut AgentContext<'_>) {
        let levels: Vec<u8> = self
            .ship
            .crew_members()
            .map(|(role, npc)| npc.skill(role.key_skill()))
            .collect();
        if levels.is_empty() {
            return;
        }
        let amount: i64 = levels
            .iter()
            .map(|level| CREW_SALARY_PER_LEVEL * i64::from((*level).max(1)))
            .sum();
        let month = date.month().unwrap_or(0);

        if !self.cover_shortfall(now, cx, "payroll", amount) {
            return;
        }
        let memo = format!("Crew payroll - {} crew - Month {}", levels.len(), month);
        if let Err(err) = self.company.pay(now, CREW_PAYROLL, amount, &memo) {
            warn!(ship = self.ship.name(), %err, "payroll refused");
            return;
        }
        debug!(ship = self.ship.name(), date = %date, amount, "crew paid");
        cx.events.log(Event::Payroll {
            day: now,
            ship: self.ship.name().to_string(),
            month,
            crew: levels.len(),
            amount,
        });
    }

    /// Flag maintenance if it has fallen due on `date`
    pub(super) fn maintenance_due(&mut self, date: TravellerDate) -> bool {
        if self.ship.maintenance().is_due(date) {
            self.ship.maintenance_mut().needs_maintenance = true;
            true
        } else {
            false
        }
    }

    /// Pay for the annual overhaul, sharing any profit with the crew first
    pub(super) fn perform_maintenance(&mut self, now: f64, cx: &mut AgentContext<'_>) {
        let date = cx.date_at(now);
        let cost = self.ship.class().maintenance_cost();
        let annual_profit = self.company.balance() - self.last_year_balance;
        let crew_share = if annual_profit > 0 {
            (annual_profit as f64 * self.policy.crew_profit_share).round() as i64
        } else {
            0
        };
        info!(
            ship = self.ship.name(),
            "annual profit: {}",
            format_credits(annual_profit)
        );

        if !self.cover_shortfall(now, cx, "maintenance", cost + crew_share) {
            return;
        }

        let percent = (self.policy.crew_profit_share * 100.0).round();
        if crew_share > 0 {
            let memo = format!(
                "Crew profit share ({}% of annual profit {})",
                percent,
                format_credits(annual_profit)
            );
            if let Err(err) = self.company.pay(now, CREW_PROFIT_SHARE, crew_share, &memo) {
                warn!(ship = self.ship.name(), %err, "crew profit share refused");
            } else {
                info!(
                    ship = self.ship.name(),
                    "crew profit share: {} ({}% of annual profit)",
                    format_credits(crew_share),
                    percent
                );
            }
        }
        let memo = format!("Annual maintenance {}", date.year());
        if let Err(err) = self.company.pay(now, SHIPYARD, cost, &memo) {
            warn!(ship = self.ship.name(), %err, "maintenance payment refused");
        }

        self.ship.maintenance_mut().complete(date.year());
        self.last_year_balance = self.company.balance();
        cx.events.log(Event::Maintenance {
            day: now,
            ship: self.ship.name().to_string(),
            year: date.year(),
            cost,
            crew_share,
            annual_profit,
        });
    }

    /// Make sure `required` Credits are on hand
    ///
    /// Civilian ships that cannot pay go broke and `false` is returned; the
    /// balance is left untouched. Military and specialized ships receive
    /// patron bailouts until the charge is covered.
    pub(super) fn cover_shortfall(
        &mut self,
        now: f64,
        cx: &mut AgentContext<'_>,
        reason: &str,
        required: i64,
    ) -> bool {
        let available = self.company.balance();
        if available >= required {
            return true;
        }

        if !self.ship.class().role.has_patron() {
            self.broke = true;
            warn!(
                ship = self.ship.name(),
                reason,
                "ship is broke: needs {}, has {}",
                format_credits(required),
                format_credits(available)
            );
            cx.events.log(Event::Broke {
                day: now,
                ship: self.ship.name().to_string(),
                reason: reason.to_string(),
                required,
                available,
            });
            return false;
        }

        let bailout = self.policy.patron_bailout.max(1);
        let grants = (required - available + bailout - 1) / bailout;
        for _ in 0..grants {
            let memo = format!("Patron bailout ({})", reason);
            self.credit(now, PATRON, bailout, &memo);
            self.bailouts += 1;
            info!(
                ship = self.ship.name(),
                reason,
                "patron bailout of {}",
                format_credits(bailout)
            );
            cx.events.log(Event::PatronBailout {
                day: now,
                ship: self.ship.name().to_string(),
                amount: bailout,
                reason: reason.to_string(),
            });
        }
        true
    }
}
