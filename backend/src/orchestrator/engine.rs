//! Simulation engine
//!
//! Builds a fleet of [`StarshipAgent`]s from a [`SimulationConfig`] and the
//! world / ship class catalogue, then drives every agent's trading and
//! payroll tasks on one discrete-event [`Clock`].
//!
//! # Determinism
//!
//! All randomness comes from one seeded [`RngManager`] shared by the fleet,
//! and tasks due at the same instant run in the order they were scheduled.
//! Two simulations built from the same config and catalogue therefore
//! produce the same events and the same final balances.

use crate::agent::{AgentContext, StarshipAgent, TradingPolicy};
use crate::core::{Clock, TravellerDate};
use crate::data::{DataError, GameContext};
use crate::finance::{Company, FinanceError};
use crate::models::{CrewRole, EventLog, MaintenanceSchedule, Npc, ShipClass, ShipRole, Starship};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::results::{compute_config_hash, SimulationResults};

/// Random draws spent looking for a starting world with somewhere to go
pub const STARTING_WORLD_ATTEMPTS: usize = 100;

/// Skills a captain is rolled for on top of leadership
const CAPTAIN_SKILLS: [&str; 4] = ["trader", "liaison", "admin", "streetwise"];

// ============================================================================
// Configuration
// ============================================================================

/// Everything needed to set up a run, apart from the catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub num_ships: usize,
    /// Simulated days to run
    pub duration_days: f64,
    /// Credits each company starts with
    pub starting_capital: i64,
    pub starting_year: u32,
    /// Day of year (1-365) at time zero
    pub starting_day: u32,
    /// Fraction of the fleet that trades speculative cargo
    pub speculate_cargo_pct: f64,
    pub rng_seed: u64,
    /// Roles to build ships for; empty means every role in the catalogue
    pub roles: Vec<ShipRole>,
    pub policy: TradingPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_ships: 10,
            duration_days: 365.0,
            starting_capital: 1_000_000,
            starting_year: 1104,
            starting_day: 360,
            speculate_cargo_pct: 1.0,
            rng_seed: 42,
            roles: Vec::new(),
            policy: TradingPolicy::default(),
        }
    }
}

impl SimulationConfig {
    /// Check ranges; returns the first problem found
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.num_ships == 0 {
            return Err(SimulationError::InvalidConfig(
                "num_ships must be at least 1".to_string(),
            ));
        }
        if !(self.duration_days.is_finite() && self.duration_days >= 0.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "duration_days must be a non-negative number, got {}",
                self.duration_days
            )));
        }
        if self.starting_capital < 0 {
            return Err(SimulationError::Finance(FinanceError::NegativeCapital(
                self.starting_capital,
            )));
        }
        if !(1..=365).contains(&self.starting_day) {
            return Err(SimulationError::InvalidConfig(format!(
                "starting_day must be between 1 and 365, got {}",
                self.starting_day
            )));
        }
        if !(0.0..=1.0).contains(&self.speculate_cargo_pct) {
            return Err(SimulationError::InvalidConfig(format!(
                "speculate_cargo_pct must be between 0 and 1, got {}",
                self.speculate_cargo_pct
            )));
        }
        self.policy.validate().map_err(SimulationError::InvalidConfig)
    }

    pub fn start_date(&self) -> TravellerDate {
        TravellerDate::new(self.starting_day, self.starting_year)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Simulation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Map or ship class data problem
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Company setup failed
    #[error("Finance error: {0}")]
    Finance(#[from] FinanceError),

    #[error("Ship not found: {0}")]
    ShipNotFound(String),

    /// Config or results could not be serialized for hashing
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Trading,
    Payroll,
}

/// A scheduled wake-up: which agent, and which of its tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskKey {
    pub agent: usize,
    pub kind: TaskKind,
}

// ============================================================================
// Simulation
// ============================================================================

/// A fleet of trading ships on a shared clock
pub struct Simulation {
    config: SimulationConfig,
    config_hash: String,
    game: GameContext,
    start_date: TravellerDate,
    clock: Clock<TaskKey>,
    rng: RngManager,
    agents: Vec<StarshipAgent>,
    events: EventLog,
}

impl Simulation {
    /// Set up the fleet
    ///
    /// For each ship: pick a class by frequency, pick a starting world it can
    /// refuel at (and leave from), roll its maintenance day, hire and train
    /// its crew, capitalize its company and choose a first destination.
    /// Both tasks of every agent are scheduled at time zero.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` / `Finance`: a config value is out of range
    /// - `Data`: a requested role has no ship classes, or the map is empty
    ///
    /// # Example
    ///
    /// ```rust
    /// use t5sim_core::data::GameContext;
    /// use t5sim_core::orchestrator::{Simulation, SimulationConfig};
    ///
    /// let config = SimulationConfig {
    ///     num_ships: 3,
    ///     duration_days: 30.0,
    ///     ..SimulationConfig::default()
    /// };
    /// let mut sim = Simulation::new(config, GameContext::embedded().unwrap()).unwrap();
    /// let results = sim.run().unwrap();
    /// assert_eq!(results.num_ships, 3);
    /// ```
    pub fn new(config: SimulationConfig, catalogue: GameContext) -> Result<Self, SimulationError> {
        config.validate()?;
        let config_hash = compute_config_hash(&config)?;
        let game = catalogue.with_roles(&config.roles)?;
        let start_date = config.start_date();

        let mut rng = RngManager::new(config.rng_seed);
        let mut events = EventLog::new();
        let speculators =
            (config.num_ships as f64 * config.speculate_cargo_pct).round() as usize;

        let mut agents = Vec::with_capacity(config.num_ships);
        for index in 0..config.num_ships {
            let name = format!("Trader_{:03}", index + 1);
            let class = pick_ship_class(game.ship_classes(), &mut rng)
                .cloned()
                .ok_or(DataError::Empty("ship classes"))?;
            let location = pick_starting_world(&game, &class, &mut rng)?;

            let mut ship = Starship::new(&name, location, class);
            ship.set_maintenance(MaintenanceSchedule::roll(&mut rng, config.starting_year));
            hire_crew(&mut ship, &mut rng);

            let company = Company::new(&name, config.starting_capital)?;
            let mut agent =
                StarshipAgent::new(ship, company, config.policy.clone(), index < speculators);
            let mut cx = AgentContext {
                game: &game,
                rng: &mut rng,
                events: &mut events,
                start_date,
            };
            agent.choose_next_destination(0.0, &mut cx)?;
            debug!(
                ship = agent.name(),
                class = %agent.ship().class().class_name,
                location = agent.ship().location(),
                destination = agent.ship().destination(),
                "ship commissioned"
            );
            agents.push(agent);
        }

        let mut clock = Clock::new();
        for agent in 0..agents.len() {
            clock.schedule(0.0, TaskKey { agent, kind: TaskKind::Trading });
            clock.schedule(0.0, TaskKey { agent, kind: TaskKind::Payroll });
        }

        info!(
            ships = agents.len(),
            days = config.duration_days,
            seed = config.rng_seed,
            start = %start_date,
            "simulation initialized"
        );

        Ok(Self {
            config,
            config_hash,
            game,
            start_date,
            clock,
            rng,
            agents,
            events,
        })
    }

    /// Run to the configured duration and summarize
    pub fn run(&mut self) -> Result<SimulationResults, SimulationError> {
        self.run_until(self.config.duration_days)?;
        info!(
            day = self.clock.now(),
            events = self.events.len(),
            "simulation finished"
        );
        Ok(self.results())
    }

    /// Process every wake-up strictly before `until`
    ///
    /// May be called repeatedly with increasing horizons; each call
    /// continues where the previous one stopped.
    pub fn run_until(&mut self, until: f64) -> Result<(), SimulationError> {
        let agents = &mut self.agents;
        let game = &self.game;
        let rng = &mut self.rng;
        let events = &mut self.events;
        let start_date = self.start_date;

        self.clock.run(until, |now, key| {
            let Some(agent) = agents.get_mut(key.agent) else {
                return Ok(None);
            };
            let mut cx = AgentContext {
                game,
                rng: &mut *rng,
                events: &mut *events,
                start_date,
            };
            match key.kind {
                TaskKind::Trading => agent.resume_trading(now, &mut cx).map(Some),
                TaskKind::Payroll => Ok(agent.resume_payroll(now, &mut cx)),
            }
        })?;
        Ok(())
    }

    pub fn results(&self) -> SimulationResults {
        SimulationResults::collect(self)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// SHA-256 of the canonical JSON form of the config
    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    pub fn game(&self) -> &GameContext {
        &self.game
    }

    /// Simulated days since the start
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn start_date(&self) -> TravellerDate {
        self.start_date
    }

    pub fn current_date(&self) -> TravellerDate {
        self.start_date.advanced_by(self.clock.now())
    }

    pub fn agents(&self) -> &[StarshipAgent] {
        &self.agents
    }

    pub fn agent(&self, name: &str) -> Result<&StarshipAgent, SimulationError> {
        self.agents
            .iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| SimulationError::ShipNotFound(name.to_string()))
    }

    pub fn agent_mut(&mut self, name: &str) -> Result<&mut StarshipAgent, SimulationError> {
        self.agents
            .iter_mut()
            .find(|a| a.name() == name)
            .ok_or_else(|| SimulationError::ShipNotFound(name.to_string()))
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Wake-ups still queued
    pub fn pending_tasks(&self) -> usize {
        self.clock.pending()
    }
}

// ============================================================================
// Fleet setup
// ============================================================================

/// Pick a class with probability proportional to its frequency
///
/// With several roles enabled each role's frequencies sum to one, so every
/// role gets an equal share of the fleet. Falls back to a uniform pick when
/// all frequencies are zero.
fn pick_ship_class<'a>(classes: &'a [ShipClass], rng: &mut RngManager) -> Option<&'a ShipClass> {
    let total: f64 = classes.iter().map(|c| c.frequency).sum();
    if total <= 0.0 {
        return rng.choose(classes);
    }
    let mut target = rng.next_f64() * total;
    for class in classes {
        if target < class.frequency {
            return Some(class);
        }
        target -= class.frequency;
    }
    classes.iter().rev().find(|c| c.frequency > 0.0)
}

/// A world where `class` can refuel and has at least one place to jump to
///
/// Worlds are drawn at random up to [`STARTING_WORLD_ATTEMPTS`] times. After
/// that the first compatible world is used even if it is a dead end, and
/// failing that the first world on the map.
fn pick_starting_world(
    game: &GameContext,
    class: &ShipClass,
    rng: &mut RngManager,
) -> Result<String, SimulationError> {
    let worlds: Vec<_> = game.worlds().collect();
    for _ in 0..STARTING_WORLD_ATTEMPTS {
        let Some(world) = rng.choose(&worlds) else {
            break;
        };
        if !class.can_refuel_at(world) {
            continue;
        }
        let has_destination = game
            .worlds_in_jump_range(world.name(), class.jump_rating)?
            .into_iter()
            .any(|w| class.can_refuel_at(w));
        if has_destination {
            return Ok(world.name().to_string());
        }
    }

    warn!(
        class = %class.class_name,
        "no starting world with a reachable destination after {} attempts",
        STARTING_WORLD_ATTEMPTS
    );
    worlds
        .iter()
        .find(|w| class.can_refuel_at(w))
        .or_else(|| worlds.first())
        .map(|w| w.name().to_string())
        .ok_or_else(|| DataError::Empty("worlds").into())
}

/// Fill every crew position with a freshly rolled NPC
///
/// Each hand gets level 1-3 in their position's key skill. The captain also
/// rolls 0-2 in the business skills used in port.
fn hire_crew(ship: &mut Starship, rng: &mut RngManager) {
    let roles = ship.class().crew_roles();
    for (seat, role) in roles.into_iter().enumerate() {
        let mut npc = Npc::new(
            format!("{} {} of {}", role.title(), seat + 1, ship.name()),
            ship.location(),
        );
        let mut skills = vec![(role.key_skill(), rng.range(1, 4) as u8)];
        if role == CrewRole::Captain {
            for skill in CAPTAIN_SKILLS {
                skills.push((skill, rng.range(0, 3) as u8));
            }
        }
        for (skill, level) in skills {
            if let Err(err) = npc.set_skill(skill, level) {
                warn!(ship = ship.name(), %err, "crew skill not set");
            }
        }
        if let Err(err) = ship.hire(role, npc) {
            warn!(ship = ship.name(), %err, "crew position left vacant");
        }
    }
}
