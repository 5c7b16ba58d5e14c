//! Port business and navigation: passengers, mail, freight, speculative
//! cargo, maneuvering, jumping and picking the next destination

use super::{
    AgentContext, StarshipAgent, CARGO_BROKERS, CARGO_MARKET, FREIGHT_SHIPPERS, MAIL_SERVICE,
    PASSENGER_FARES,
};
use crate::data::tables::{
    actual_value_multiplier, FREIGHT_RATE_PER_TON, HIGH_PASSAGE_FARE, LOW_PASSAGE_FARE,
    LOW_PASSAGE_REVIVAL_TARGET, MAIL_PAYMENT, MID_PASSAGE_FARE,
};
use crate::data::{DataError, GameContext};
use crate::finance::format_credits;
use crate::models::{
    DestinationReason, Event, Lot, MailBundle, Npc, PassageClass, World,
};
use tracing::{debug, info, warn};

impl StarshipAgent {
    // ------------------------------------------------------------------------
    // Arrival business
    // ------------------------------------------------------------------------

    /// Disembark passengers, deliver mail and hand over freight
    pub(super) fn offload(&mut self, now: f64, cx: &mut AgentContext<'_>) -> Result<(), DataError> {
        let game = cx.game;
        let world = game.world(self.ship.location())?;

        let high = self.ship.offload_passengers(PassageClass::High).len() as u32;
        let mid = self.ship.offload_passengers(PassageClass::Mid).len() as u32;
        let lows = self.ship.offload_passengers(PassageClass::Low);
        let low = lows.len() as u32;
        let medic = i32::from(self.ship.best_crew_skill("medic"));
        let mut low_deaths = 0;
        for mut passenger in lows {
            if cx.rng.roll_dice(2) + medic < LOW_PASSAGE_REVIVAL_TARGET {
                passenger.kill();
                low_deaths += 1;
            }
        }
        if low_deaths > 0 {
            warn!(
                ship = self.ship.name(),
                world = world.name(),
                "{} low passenger(s) failed to revive",
                low_deaths
            );
        }
        if high + mid + low > 0 {
            cx.events.log(Event::PassengersDisembarked {
                day: now,
                ship: self.ship.name().to_string(),
                high,
                mid,
                low,
                low_deaths,
            });
        }

        if let Ok(bundles) = self.ship.offload_mail() {
            let payment = MAIL_PAYMENT * bundles.len() as i64;
            let memo = format!("Mail delivery ({} bundle(s)) at {}", bundles.len(), world.name());
            self.credit(now, MAIL_SERVICE, payment, &memo);
            cx.events.log(Event::MailDelivered {
                day: now,
                ship: self.ship.name().to_string(),
                bundles: bundles.len(),
                payment,
            });
        }

        let freight = self.ship.offload_all_freight();
        if !freight.is_empty() {
            cx.events.log(Event::FreightDelivered {
                day: now,
                ship: self.ship.name().to_string(),
                world: world.name().to_string(),
                lots: freight.len(),
                tons: freight.iter().map(Lot::mass).sum(),
            });
        }
        Ok(())
    }

    /// Sell every speculative lot aboard through the local brokers
    pub(super) fn sell_cargo(&mut self, now: f64, cx: &mut AgentContext<'_>) -> Result<(), DataError> {
        let game = cx.game;
        let world = game.world(self.ship.location())?;
        let services = world.services();
        let modifier = services.broker_modifier + i32::from(self.ship.best_crew_skill("trader"));

        let lots: Vec<Lot> = self.ship.cargo_lots().to_vec();
        for lot in lots {
            let per_ton = lot.sale_value_on(world);
            let multiplier = actual_value_multiplier(cx.rng.flux() + modifier);
            let gross = (per_ton as f64 * f64::from(lot.mass()) * multiplier).round() as i64;
            let fee = (gross as f64 * services.broker_fee).round() as i64;
            let revenue = gross - fee;
            let profit = revenue - lot.purchase_cost();

            if self.ship.offload_lot(lot.serial()).is_err() {
                continue;
            }
            let memo = format!(
                "Sold {} ({} tons) at {}, broker fee {}",
                lot.lot_id(),
                lot.mass(),
                world.name(),
                format_credits(fee)
            );
            self.credit(now, CARGO_BROKERS, revenue, &memo);
            self.cargo_sales += 1;
            debug!(
                ship = self.ship.name(),
                world = world.name(),
                tons = lot.mass(),
                revenue,
                profit,
                "cargo sold"
            );
            cx.events.log(Event::CargoSold {
                day: now,
                ship: self.ship.name().to_string(),
                world: world.name().to_string(),
                lot_id: lot.lot_id(),
                tons: lot.mass(),
                revenue,
                profit,
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Departure business
    // ------------------------------------------------------------------------

    /// Look for one freight lot; paid on loading
    pub(super) fn load_freight(&mut self, now: f64, cx: &mut AgentContext<'_>) -> Result<(), DataError> {
        self.freight_loaded_this_visit = false;
        let game = cx.game;
        let world = game.world(self.ship.location())?;

        if self
            .ship
            .is_hold_mostly_full(self.policy.freight_threshold)
            .unwrap_or(true)
        {
            return Ok(());
        }
        let liaison = self.ship.best_crew_skill("liaison");
        let mass = world.freight_lot_mass(liaison, cx.rng);
        if mass == 0 {
            return Ok(());
        }

        match self.ship.onload_lot(Lot::freight(world, mass)) {
            Ok(()) => {
                let payment = FREIGHT_RATE_PER_TON * i64::from(mass);
                let memo = format!("Freight {} tons from {}", mass, world.name());
                self.credit(now, FREIGHT_SHIPPERS, payment, &memo);
                self.freight_loaded_this_visit = true;
                cx.events.log(Event::FreightLoaded {
                    day: now,
                    ship: self.ship.name().to_string(),
                    world: world.name().to_string(),
                    tons: mass,
                    payment,
                });
            }
            Err(err) => {
                debug!(ship = self.ship.name(), %err, "freight lot of {} tons declined", mass);
            }
        }
        Ok(())
    }

    /// Whether to spend another day searching for freight
    ///
    /// The search continues while the hold is below the freight threshold
    /// and fewer than `max_freight_attempts` consecutive searches came up
    /// empty; any successful load resets the count.
    pub(super) fn keep_loading_freight(&mut self) -> bool {
        if self.freight_loaded_this_visit {
            self.freight_attempts = 0;
        } else {
            self.freight_attempts += 1;
        }
        let below_threshold = !self
            .ship
            .is_hold_mostly_full(self.policy.freight_threshold)
            .unwrap_or(true);
        if below_threshold && self.freight_attempts < self.policy.max_freight_attempts {
            true
        } else {
            self.freight_attempts = 0;
            false
        }
    }

    /// Buy speculative lots expected to sell at a profit at the destination
    ///
    /// Money needed to top off the tanks here is held back.
    pub(super) fn load_cargo(&mut self, now: f64, cx: &mut AgentContext<'_>) -> Result<(), DataError> {
        if !self.speculate_cargo {
            return Ok(());
        }
        let game = cx.game;
        let world = game.world(self.ship.location())?;
        let market = game.world(self.ship.destination())?;
        let free = self.ship.free_space();
        if market.name() == world.name() || free == 0 {
            return Ok(());
        }

        let reserve = self.fuel_reserve(world);
        let offered = world.generate_speculative_cargo(cx.rng, free, free);
        let (mut lots, mut tons, mut cost, mut skipped) = (0usize, 0u32, 0i64, 0usize);
        for lot in offered {
            if !lot.is_profitable_on(market) {
                skipped += 1;
                continue;
            }
            let price = lot.purchase_cost();
            if self.company.balance() - price < reserve {
                debug!(
                    ship = self.ship.name(),
                    reserve,
                    "skipping cargo purchase, funds held back for fuel"
                );
                break;
            }
            if self.ship.can_onload_lot(&lot).is_err() {
                break;
            }
            let memo = format!(
                "Purchased {} ({} tons) at {}",
                lot.lot_id(),
                lot.mass(),
                world.name()
            );
            if let Err(err) = self.company.pay(now, CARGO_MARKET, price, &memo) {
                debug!(ship = self.ship.name(), %err, "cargo purchase refused");
                break;
            }
            let mass = lot.mass();
            if let Err(err) = self.ship.onload_lot(lot) {
                warn!(ship = self.ship.name(), %err, "purchased lot would not load, refunding");
                self.credit(now, CARGO_MARKET, price, "Refund of unloadable cargo");
                break;
            }
            lots += 1;
            tons += mass;
            cost += price;
        }

        if lots > 0 || skipped > 0 {
            cx.events.log(Event::CargoPurchased {
                day: now,
                ship: self.ship.name().to_string(),
                world: world.name().to_string(),
                lots,
                tons,
                cost,
                skipped,
            });
        }
        Ok(())
    }

    /// Take one mail bundle if the route carries mail
    pub(super) fn load_mail(&mut self, now: f64, cx: &mut AgentContext<'_>) -> Result<(), DataError> {
        if self.ship.mail().len() >= self.ship.mail_locker_size() {
            return Ok(());
        }
        let game = cx.game;
        let origin = game.world(self.ship.location())?;
        let destination = game.world(self.ship.destination())?;
        if origin.name() == destination.name() {
            return Ok(());
        }
        let Ok(bundle) = MailBundle::new(origin, destination) else {
            return Ok(());
        };
        if self.ship.onload_mail(bundle).is_ok() {
            cx.events.log(Event::MailLoaded {
                day: now,
                ship: self.ship.name().to_string(),
                origin: origin.name().to_string(),
                destination: destination.name().to_string(),
            });
        }
        Ok(())
    }

    /// Board passengers bound for the destination; fares are paid up front
    pub(super) fn load_passengers(
        &mut self,
        now: f64,
        cx: &mut AgentContext<'_>,
    ) -> Result<(), DataError> {
        let game = cx.game;
        let world = game.world(self.ship.location())?;
        if self.ship.destination() == world.name() {
            return Ok(());
        }

        let wanted = [
            (
                PassageClass::High,
                world.high_passenger_availability(self.ship.best_crew_skill("steward"), cx.rng),
            ),
            (
                PassageClass::Mid,
                world.mid_passenger_availability(self.ship.best_crew_skill("admin"), cx.rng),
            ),
            (
                PassageClass::Low,
                world.low_passenger_availability(self.ship.best_crew_skill("streetwise"), cx.rng),
            ),
        ];

        let mut boarded = [0u32; 3];
        for (slot, (class, count)) in wanted.into_iter().enumerate() {
            for n in 0..count {
                let passenger = Npc::new(format!("{} passenger {}", class, n + 1), world.name());
                if self.ship.onload_passenger(passenger, class).is_err() {
                    break;
                }
                boarded[slot] += 1;
            }
        }

        let [high, mid, low] = boarded;
        let fares = HIGH_PASSAGE_FARE * i64::from(high)
            + MID_PASSAGE_FARE * i64::from(mid)
            + LOW_PASSAGE_FARE * i64::from(low);
        if fares > 0 {
            let memo = format!(
                "Passenger fares: {} high, {} mid, {} low to {}",
                high,
                mid,
                low,
                self.ship.destination()
            );
            self.credit(now, PASSENGER_FARES, fares, &memo);
            cx.events.log(Event::PassengersBoarded {
                day: now,
                ship: self.ship.name().to_string(),
                high,
                mid,
                low,
                fares,
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Burn one ton of operations fuel for a maneuver leg
    pub(super) fn maneuver(&mut self) {
        if let Err(err) = self.ship.fuel_mut().burn_ops(1) {
            debug!(ship = self.ship.name(), %err, "maneuvering on empty operations tanks");
        }
    }

    /// Jump to the destination and plan the following leg
    pub(super) fn jump(&mut self, now: f64, cx: &mut AgentContext<'_>) -> Result<(), DataError> {
        let game = cx.game;
        let origin = game.world(self.ship.location())?;
        let target = game.world(self.ship.destination())?;
        let parsecs = origin.distance_to(target);

        match self.ship.jump(parsecs) {
            Ok(()) => {
                self.voyage_count += 1;
                info!(
                    ship = self.ship.name(),
                    voyage = self.voyage_count,
                    "jumped {} -> {} ({} pc)",
                    origin.name(),
                    target.name(),
                    parsecs
                );
                cx.events.log(Event::Jumped {
                    day: now,
                    ship: self.ship.name().to_string(),
                    from: origin.name().to_string(),
                    to: target.name().to_string(),
                    parsecs,
                });
                self.choose_next_destination(now, cx)?;
            }
            Err(err) => {
                warn!(ship = self.ship.name(), %err, "jump to {} aborted", target.name());
                cx.events.log(Event::JumpAborted {
                    day: now,
                    ship: self.ship.name().to_string(),
                    destination: target.name().to_string(),
                    reason: err.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Worlds in jump range whose starport sells fuel this ship can burn
    pub fn reachable_destinations<'g>(
        &self,
        game: &'g GameContext,
    ) -> Result<Vec<&'g World>, DataError> {
        let class = self.ship.class();
        let in_range = game.worlds_in_jump_range(self.ship.location(), class.jump_rating)?;
        Ok(in_range
            .into_iter()
            .filter(|w| class.can_refuel_at(w))
            .collect())
    }

    /// Set course for the most profitable reachable world
    ///
    /// Ties go to the alphabetically first world. Without a profitable
    /// world a reachable one is picked at random; with nothing in range the
    /// ship stays where it is.
    pub fn choose_next_destination(
        &mut self,
        now: f64,
        cx: &mut AgentContext<'_>,
    ) -> Result<(), DataError> {
        let game = cx.game;
        let here = game.world(self.ship.location())?;
        let reachable = self.reachable_destinations(game)?;

        let best = reachable
            .iter()
            .map(|w| (Lot::margin_between(here, w), *w))
            .filter(|(margin, _)| *margin > 0)
            .max_by(|(ma, wa), (mb, wb)| ma.cmp(mb).then_with(|| wb.name().cmp(wa.name())));

        let (destination, reason, margin_per_ton) = match best {
            Some((margin, world)) => (world, DestinationReason::Profitable, Some(margin)),
            None => match cx.rng.choose(&reachable) {
                Some(world) => (*world, DestinationReason::Random, None),
                None => (here, DestinationReason::Stranded, None),
            },
        };

        if reason == DestinationReason::Stranded {
            warn!(ship = self.ship.name(), "no reachable destination from {}", here.name());
        }
        self.ship.set_course_for(destination.name());
        cx.events.log(Event::DestinationChosen {
            day: now,
            ship: self.ship.name().to_string(),
            destination: destination.name().to_string(),
            reason,
            margin_per_ton,
        });
        Ok(())
    }
}
