//! Tests for running costs: fuel, payroll, maintenance, bailouts and going broke

use t5sim_core::agent::BROKE_IDLE_DAYS;
use t5sim_core::models::{MaintenanceSchedule, ShipClass};
use t5sim_core::{
    AgentContext, Company, Event, EventLog, GameContext, Npc, RngManager, Starship,
    StarshipAgent, StarshipState, TradingPolicy, TravellerDate,
};

struct Harness {
    game: GameContext,
    rng: RngManager,
    events: EventLog,
    start_date: TravellerDate,
}

impl Harness {
    fn starting(day: u32, year: u32) -> Self {
        Self {
            game: GameContext::embedded().unwrap(),
            rng: RngManager::new(42),
            events: EventLog::new(),
            start_date: TravellerDate::new(day, year),
        }
    }

    fn cx(&mut self) -> AgentContext<'_> {
        AgentContext {
            game: &self.game,
            rng: &mut self.rng,
            events: &mut self.events,
            start_date: self.start_date,
        }
    }

    fn class(&self, name: &str) -> ShipClass {
        self.game.ship_class(name).unwrap().clone()
    }

    fn agent(&self, class_name: &str, world: &str, capital: i64) -> StarshipAgent {
        let ship = Starship::new("Trader_001", world, self.class(class_name));
        let company = Company::new("Trader_001", capital).unwrap();
        StarshipAgent::new(ship, company, TradingPolicy::default(), false)
    }
}

/// Fill every position with a crew member at `level` in the position's key skill
fn crew_up(agent: &mut StarshipAgent, level: u8) {
    let roles = agent.ship().class().crew_roles();
    for (seat, role) in roles.into_iter().enumerate() {
        let mut npc = Npc::new(format!("{} {}", role.title(), seat + 1), "Rhylanor");
        npc.set_skill(role.key_skill(), level).unwrap();
        agent.ship_mut().hire(role, npc).unwrap();
    }
}

fn memos(agent: &StarshipAgent) -> Vec<String> {
    agent
        .company()
        .cash()
        .entries()
        .iter()
        .map(|e| e.memo.clone())
        .collect()
}

// ============================================================================
// Fuel
// ============================================================================

#[test]
fn test_refuel_tops_off_with_refined_fuel() {
    let mut h = Harness::starting(360, 1104);
    let mut agent = h
        .agent("Free Trader", "Rhylanor", 1_000_000)
        .with_state(StarshipState::LoadingFuel);
    agent.ship_mut().fuel_mut().burn_jump(20).unwrap();

    let delay = agent.resume_trading(0.0, &mut h.cx()).unwrap();
    // Class A starport: two dice of hours
    assert!((2.0 / 24.0..=12.0 / 24.0).contains(&delay), "delay {}", delay);
    assert!(agent.ship().fuel().is_full());
    assert_eq!(agent.balance(), 1_000_000 - 20 * 500);
    assert!(memos(&agent).contains(&"Refuel 20 tons refined fuel at Rhylanor".to_string()));

    let refueled = h.events.events_of_type("Refueled");
    assert_eq!(refueled.len(), 1);
    assert!(matches!(
        refueled[0],
        Event::Refueled {
            tons: 20,
            cost: 10_000,
            refined: true,
            partial: false,
            ..
        }
    ));
}

#[test]
fn test_refiner_buys_unrefined_fuel() {
    let mut h = Harness::starting(360, 1104);
    let mut agent = h
        .agent("Scout", "Rhylanor", 1_000_000)
        .with_state(StarshipState::LoadingFuel);
    agent.ship_mut().fuel_mut().burn_jump(40).unwrap();

    agent.resume_trading(0.0, &mut h.cx()).unwrap();
    assert_eq!(agent.balance(), 1_000_000 - 40 * 100);
    assert!(memos(&agent).contains(&"Refuel 40 tons unrefined fuel at Rhylanor".to_string()));
}

#[test]
fn test_partial_refuel_spends_everything() {
    let mut h = Harness::starting(360, 1104);
    let mut agent = h
        .agent("Free Trader", "Rhylanor", 5_000)
        .with_state(StarshipState::LoadingFuel);
    agent.ship_mut().fuel_mut().burn_jump(20).unwrap();

    agent.resume_trading(0.0, &mut h.cx()).unwrap();
    assert_eq!(agent.balance(), 0);
    assert_eq!(agent.ship().fuel().jump(), 10);
    assert!(!agent.is_broke());
    assert!(matches!(
        h.events.events_of_type("Refueled")[0],
        Event::Refueled {
            tons: 10,
            partial: true,
            ..
        }
    ));
}

#[test]
fn test_no_compatible_fuel_at_class_c_port() {
    let mut h = Harness::starting(360, 1104);
    let mut agent = h
        .agent("Free Trader", "Ivendo", 1_000_000)
        .with_state(StarshipState::LoadingFuel);
    agent.ship_mut().fuel_mut().burn_jump(20).unwrap();

    let delay = agent.resume_trading(0.0, &mut h.cx()).unwrap();
    // Class C starport: four dice of hours, even with nothing to buy
    assert!((4.0 / 24.0..=1.0).contains(&delay), "delay {}", delay);
    assert_eq!(agent.balance(), 1_000_000);
    assert_eq!(agent.ship().fuel().jump(), 0);
    assert!(h.events.events_of_type("Refueled").is_empty());
}

#[test]
fn test_civilian_ship_goes_broke_on_fuel() {
    let mut h = Harness::starting(360, 1104);
    let mut agent = h
        .agent("Free Trader", "Rhylanor", 100)
        .with_state(StarshipState::LoadingFuel);
    agent.ship_mut().fuel_mut().burn_jump(20).unwrap();

    agent.resume_trading(0.0, &mut h.cx()).unwrap();
    assert!(agent.is_broke());
    assert_eq!(agent.balance(), 100);
    assert_eq!(agent.company().cash().entries().len(), 1);

    let broke = h.events.events_of_type("Broke");
    assert_eq!(broke.len(), 1);
    assert!(matches!(
        broke[0],
        Event::Broke {
            required: 10_000,
            available: 100,
            ..
        }
    ));

    // A broke ship idles and its payroll task ends
    let state = agent.state();
    assert_eq!(agent.resume_trading(1.0, &mut h.cx()).unwrap(), BROKE_IDLE_DAYS);
    assert_eq!(agent.state(), state);
    assert_eq!(agent.resume_payroll(1.0, &mut h.cx()), None);
    assert_eq!(h.events.events_of_type("Broke").len(), 1);
}

#[test]
fn test_military_ship_gets_patron_bailout_for_fuel() {
    let mut h = Harness::starting(360, 1104);
    let mut agent = h
        .agent("Close Escort", "Rhylanor", 50)
        .with_state(StarshipState::LoadingFuel);
    agent.ship_mut().fuel_mut().burn_jump(96).unwrap();

    agent.resume_trading(0.0, &mut h.cx()).unwrap();
    assert!(!agent.is_broke());
    assert_eq!(agent.bailouts(), 1);
    // 50 + 1,000,000 bailout - 96 tons unrefined at Cr100
    assert_eq!(agent.balance(), 990_450);
    assert!(agent.ship().fuel().is_full());
    assert!(memos(&agent).contains(&"Patron bailout (fuel)".to_string()));
    assert_eq!(h.events.events_of_type("PatronBailout").len(), 1);
    assert_eq!(agent.company().net_position(), 0);
}

#[test]
fn test_bailouts_cover_large_shortfalls_in_whole_grants() {
    let mut h = Harness::starting(360, 1104);
    let ship = Starship::new("Trader_001", "Rhylanor", h.class("Close Escort"));
    let company = Company::new("Trader_001", 0).unwrap();
    let policy = TradingPolicy {
        patron_bailout: 1_000,
        ..TradingPolicy::default()
    };
    let mut agent =
        StarshipAgent::new(ship, company, policy, false).with_state(StarshipState::LoadingFuel);
    agent.ship_mut().fuel_mut().burn_jump(96).unwrap();

    agent.resume_trading(0.0, &mut h.cx()).unwrap();
    // Cr9,600 needed in Cr1,000 grants
    assert_eq!(agent.bailouts(), 10);
    assert_eq!(agent.balance(), 400);
    assert!(agent.ship().fuel().is_full());
}

// ============================================================================
// Payroll
// ============================================================================

#[test]
fn test_payroll_on_month_start() {
    let mut h = Harness::starting(2, 1105);
    let mut agent = h.agent("Free Trader", "Rhylanor", 1_000_000);
    crew_up(&mut agent, 2);

    let next = agent.resume_payroll(0.0, &mut h.cx());
    assert_eq!(next, Some(28.0));
    assert_eq!(agent.balance(), 1_000_000 - 5 * 200);
    assert!(memos(&agent).contains(&"Crew payroll - 5 crew - Month 1".to_string()));
    assert!(matches!(
        h.events.events_of_type("Payroll")[0],
        Event::Payroll {
            month: 1,
            crew: 5,
            amount: 1_000,
            ..
        }
    ));
}

#[test]
fn test_payroll_waits_for_month_start() {
    let mut h = Harness::starting(360, 1104);
    let mut agent = h.agent("Free Trader", "Rhylanor", 1_000_000);
    crew_up(&mut agent, 2);

    assert_eq!(agent.resume_payroll(0.0, &mut h.cx()), Some(7.0));
    assert_eq!(agent.balance(), 1_000_000);

    // Day 2 of 1105
    assert_eq!(agent.resume_payroll(7.0, &mut h.cx()), Some(28.0));
    assert_eq!(agent.balance(), 999_000);
}

#[test]
fn test_untrained_crew_earn_minimum_salary() {
    let mut h = Harness::starting(2, 1105);
    let mut agent = h.agent("Free Trader", "Rhylanor", 1_000_000);
    crew_up(&mut agent, 0);
    agent.resume_payroll(0.0, &mut h.cx());
    assert_eq!(agent.balance(), 1_000_000 - 5 * 100);
}

#[test]
fn test_month_thirteen_runs_into_next_year() {
    let mut h = Harness::starting(338, 1105);
    let mut agent = h.agent("Free Trader", "Rhylanor", 1_000_000);
    crew_up(&mut agent, 1);
    assert_eq!(agent.resume_payroll(0.0, &mut h.cx()), Some(29.0));
    assert!(memos(&agent).contains(&"Crew payroll - 5 crew - Month 13".to_string()));
}

#[test]
fn test_ship_without_crew_pays_nothing() {
    let mut h = Harness::starting(2, 1105);
    let mut agent = h.agent("Free Trader", "Rhylanor", 1_000_000);
    assert_eq!(agent.resume_payroll(0.0, &mut h.cx()), Some(28.0));
    assert_eq!(agent.balance(), 1_000_000);
    assert!(h.events.events_of_type("Payroll").is_empty());
}

#[test]
fn test_unpaid_payroll_breaks_civilian_ship() {
    let mut h = Harness::starting(2, 1105);
    let mut agent = h.agent("Free Trader", "Rhylanor", 100);
    crew_up(&mut agent, 2);

    assert_eq!(agent.resume_payroll(0.0, &mut h.cx()), None);
    assert!(agent.is_broke());
    assert_eq!(agent.balance(), 100);
    assert_eq!(h.events.events_of_type("Broke").len(), 1);
}

#[test]
fn test_patron_covers_military_payroll() {
    let mut h = Harness::starting(2, 1105);
    let mut agent = h.agent("Close Escort", "Rhylanor", 0);
    crew_up(&mut agent, 1);
    let crew = agent.ship().crew_members().count() as i64;
    assert_eq!(crew, 9);

    assert_eq!(agent.resume_payroll(0.0, &mut h.cx()), Some(28.0));
    assert_eq!(agent.bailouts(), 1);
    assert_eq!(agent.balance(), 1_000_000 - crew * 100);
    assert!(memos(&agent).contains(&"Patron bailout (payroll)".to_string()));
}

// ============================================================================
// Maintenance
// ============================================================================

#[test]
fn test_annual_maintenance_with_crew_profit_share() {
    let mut h = Harness::starting(360, 1104);
    let mut agent = h
        .agent("Free Trader", "Rhylanor", 1_000_000)
        .with_state(StarshipState::SellingCargo);
    agent.ship_mut().set_maintenance(MaintenanceSchedule {
        annual_day: 2,
        last_year: 1104,
        needs_maintenance: false,
    });

    // Not due before the new year
    assert_eq!(agent.resume_trading(0.0, &mut h.cx()).unwrap(), 0.5);
    agent
        .company_mut()
        .receive(1.0, "Cargo Brokers", 200_000, "Windfall")
        .unwrap();

    // Day 5 of 1105
    let delay = agent.resume_trading(10.0, &mut h.cx()).unwrap();
    assert_eq!(agent.state(), StarshipState::Maintenance);
    assert_eq!(delay, 14.0);
    assert_eq!(agent.balance(), 1_200_000 - 20_000 - 37_080);
    assert_eq!(agent.last_year_balance(), agent.balance());
    assert_eq!(agent.ship().maintenance().last_year, 1105);
    assert!(!agent.ship().maintenance().needs_maintenance);

    let memos = memos(&agent);
    assert!(memos.contains(&"Annual maintenance 1105".to_string()));
    assert!(memos
        .iter()
        .any(|m| m.starts_with("Crew profit share (10% of annual profit Cr200,000)")));
    assert!(matches!(
        h.events.events_of_type("Maintenance")[0],
        Event::Maintenance {
            year: 1105,
            cost: 37_080,
            crew_share: 20_000,
            annual_profit: 200_000,
            ..
        }
    ));

    agent.resume_trading(24.0, &mut h.cx()).unwrap();
    assert_eq!(agent.state(), StarshipState::LoadingFreight);
}

#[test]
fn test_maintenance_after_a_loss_pays_no_share() {
    let mut h = Harness::starting(100, 1105);
    let mut agent = h
        .agent("Free Trader", "Rhylanor", 1_000_000)
        .with_state(StarshipState::SellingCargo);
    agent.ship_mut().set_maintenance(MaintenanceSchedule {
        annual_day: 50,
        last_year: 1104,
        needs_maintenance: false,
    });
    agent.resume_trading(0.0, &mut h.cx()).unwrap();
    agent.resume_trading(0.5, &mut h.cx()).unwrap();
    assert_eq!(agent.state(), StarshipState::Maintenance);
    assert_eq!(agent.balance(), 1_000_000 - 37_080);
    assert!(!memos(&agent).iter().any(|m| m.starts_with("Crew profit share")));
}

#[test]
fn test_unaffordable_maintenance_breaks_civilian_ship() {
    let mut h = Harness::starting(100, 1105);
    let mut agent = h
        .agent("Free Trader", "Rhylanor", 10_000)
        .with_state(StarshipState::SellingCargo);
    agent.ship_mut().set_maintenance(MaintenanceSchedule {
        annual_day: 50,
        last_year: 1104,
        needs_maintenance: false,
    });
    agent.resume_trading(0.0, &mut h.cx()).unwrap();
    agent.resume_trading(0.5, &mut h.cx()).unwrap();
    assert!(agent.is_broke());
    assert_eq!(agent.balance(), 10_000);
}
