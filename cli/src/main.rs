//! `t5sim` - run a Traveller 5 trading simulation from the command line

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use t5sim_core::orchestrator::report;
use t5sim_core::{GameContext, ShipRole, Simulation, SimulationConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run Traveller 5 trade simulation", long_about = None)]
struct Args {
    /// Number of starships to simulate
    #[arg(long, default_value_t = 10)]
    ships: usize,

    /// Simulation duration in days
    #[arg(long, default_value_t = 365.0)]
    days: f64,

    /// World map JSON file (defaults to the built-in subsector)
    #[arg(long)]
    map: Option<PathBuf>,

    /// Ship classes JSON file (defaults to the built-in designs)
    #[arg(long)]
    ships_file: Option<PathBuf>,

    /// Print detailed status updates during the simulation
    #[arg(short, long)]
    verbose: bool,

    /// Starting year in the Traveller calendar
    #[arg(long, default_value_t = 1104)]
    year: u32,

    /// Starting day of year, 1-365
    #[arg(long, default_value_t = 360)]
    day: u32,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Starting capital per ship, in Credits
    #[arg(long, default_value_t = 1_000_000)]
    capital: i64,

    /// Print the ledger for one ship (e.g. Trader_001)
    #[arg(long, value_name = "SHIP")]
    ledger: Option<String>,

    /// Print ledgers for all ships
    #[arg(long)]
    ledger_all: bool,

    /// Include civilian ships (Scout, Free Trader, etc.)
    #[arg(long)]
    include_civilian: bool,

    /// Include military ships (Close Escort, Corsair, etc.)
    #[arg(long)]
    include_military: bool,

    /// Include specialized ships (Safari Ship, Packet, Lab Ship)
    #[arg(long)]
    include_specialized: bool,

    /// Print every world and the ships there at the end
    #[arg(long)]
    worlds_report: bool,
}

impl Args {
    /// Requested roles; none requested means all of them
    fn roles(&self) -> Vec<ShipRole> {
        [
            (self.include_civilian, ShipRole::Civilian),
            (self.include_military, ShipRole::Military),
            (self.include_specialized, ShipRole::Specialized),
        ]
        .into_iter()
        .filter_map(|(wanted, role)| wanted.then_some(role))
        .collect()
    }

    fn config(&self) -> SimulationConfig {
        SimulationConfig {
            num_ships: self.ships,
            duration_days: self.days,
            starting_capital: self.capital,
            starting_year: self.year,
            starting_day: self.day,
            rng_seed: self.seed,
            roles: self.roles(),
            ..SimulationConfig::default()
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "t5sim_core=debug,t5sim=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalogue(args: &Args) -> Result<GameContext> {
    let worlds = match &args.map {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading map file {}", path.display()))?,
        None => GameContext::embedded_worlds_json().to_string(),
    };
    let ships = match &args.ships_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading ship classes file {}", path.display()))?,
        None => GameContext::embedded_ship_classes_json().to_string(),
    };
    Ok(GameContext::from_json(&worlds, &ships)?)
}

fn run(args: &Args) -> Result<()> {
    let config = args.config();
    config.validate()?;
    print!("{}", report::banner(&config));

    let catalogue = load_catalogue(args)?;
    let started = Instant::now();
    let mut sim = Simulation::new(config, catalogue)?;
    let results = sim.run()?;
    let elapsed = started.elapsed().as_secs_f64();
    info!(elapsed, "run complete");

    print!("{}", report::results_summary(&results, Some(&sim)));
    println!(
        "\nSimulation time: {:.2} seconds ({} ships, {} days)",
        elapsed, args.ships, args.days
    );

    if args.ledger_all {
        print!("{}", report::all_ledgers(&sim));
    } else if let Some(name) = &args.ledger {
        match sim.agent(name) {
            Ok(agent) => print!("{}", report::ledger_report(agent, sim.start_date())),
            Err(err) => println!("\nError: {}", err),
        }
    }
    if args.worlds_report {
        print!("{}", report::worlds_report(&sim));
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
