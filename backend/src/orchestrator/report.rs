//! Plain-text reports printed by the command-line front end

use std::fmt::Write;

use crate::agent::StarshipAgent;
use crate::core::TravellerDate;
use crate::finance::format_credits;
use crate::models::ShipRole;

use super::engine::{Simulation, SimulationConfig};
use super::results::{ShipSummary, SimulationResults};

/// Ships listed at each end of the leaderboard
pub const LEADERBOARD_SIZE: usize = 5;

fn rule() -> String {
    "=".repeat(70)
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}\n{}\n{}", rule(), title, rule());
}

fn article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

pub fn banner(config: &SimulationConfig) -> String {
    format!(
        "{rule}\nT5SIM - Traveller 5 Trading Simulation\n{rule}\nShips: {}\nDuration: {} days\nStart: {}\n",
        config.num_ships,
        config.duration_days,
        config.start_date(),
        rule = rule()
    )
}

/// Totals, averages and the civilian leaderboard
///
/// `sim` is used to expand locations to full world names when available.
pub fn results_summary(results: &SimulationResults, sim: Option<&Simulation>) -> String {
    let mut out = String::new();
    heading(&mut out, "SIMULATION RESULTS");
    let _ = writeln!(out, "Total voyages completed: {}", results.total_voyages);
    let _ = writeln!(out, "Total cargo sales: {}", results.total_cargo_sales);
    let _ = writeln!(out, "Total profit: {}", format_credits(results.total_profit));
    let _ = writeln!(
        out,
        "Ships in jump space: {}, in port: {}",
        results.ships_in_jump_space, results.ships_in_port
    );
    if results.total_bailouts > 0 {
        let _ = writeln!(out, "Patron bailouts: {}", results.total_bailouts);
    }
    let _ = writeln!(out, "Final date: {}", results.end_date);
    let _ = writeln!(out, "Config hash: {}", results.config_hash);

    let _ = writeln!(out, "\nAverage per ship:");
    let _ = writeln!(out, "  Voyages: {:.1}", results.average_voyages());
    let _ = writeln!(
        out,
        "  Profit: {}",
        format_credits(results.average_profit().round() as i64)
    );

    out.push_str(&leaderboards(results, sim));
    out
}

/// Top and bottom civilian ships, then every broke ship
///
/// Military and specialized ships live on patron money and are left off
/// the rankings, though they still appear among the broke if that ever
/// happens.
pub fn leaderboards(results: &SimulationResults, sim: Option<&Simulation>) -> String {
    let mut out = String::new();
    let ranked = results.ranked(Some(ShipRole::Civilian));
    if !ranked.is_empty() {
        let count = LEADERBOARD_SIZE.min(ranked.len());
        let (top_label, bottom_label) = if count == 1 {
            ("Top ship by balance:".to_string(), "Bottom ship by balance:".to_string())
        } else {
            (
                format!("Top {} ships by balance:", count),
                format!("Bottom {} ships by balance:", count),
            )
        };
        ship_list(&mut out, &top_label, &results.top(Some(ShipRole::Civilian), count), sim);
        ship_list(
            &mut out,
            &bottom_label,
            &results.bottom(Some(ShipRole::Civilian), count),
            sim,
        );
    }

    let mut broke = results.broke_ships();
    if !broke.is_empty() {
        broke.sort_by(|a, b| b.balance.cmp(&a.balance));
        let label = if broke.len() == 1 {
            "Broke ship:".to_string()
        } else {
            format!("Broke ships ({}):", broke.len())
        };
        ship_list(&mut out, &label, &broke, sim);
    }
    out
}

fn ship_list(out: &mut String, label: &str, ships: &[&ShipSummary], sim: Option<&Simulation>) {
    let _ = writeln!(out, "\n{}", label);
    for (i, ship) in ships.iter().enumerate() {
        let location = sim
            .and_then(|s| s.game().world(&ship.location).ok())
            .map(|w| w.full_name())
            .unwrap_or_else(|| ship.location.clone());
        let _ = writeln!(
            out,
            "  {}. {}, {} {} @ {}: {} ({} voyages)",
            i + 1,
            ship.name,
            article(&ship.ship_class),
            ship.ship_class,
            location,
            format_credits(ship.balance),
            ship.voyages
        );
    }
}

/// Every posting on one ship's cash account
pub fn ledger_report(agent: &StarshipAgent, start_date: TravellerDate) -> String {
    let mut out = String::new();
    let cash = agent.company().cash();
    heading(
        &mut out,
        &format!("LEDGER: {} ({})", cash.name(), agent.ship().class().class_name),
    );
    let _ = writeln!(
        out,
        "{:<10} {:>16} {:>16}  {:<24} Memo",
        "Date", "Amount", "Balance", "Counterparty"
    );
    for entry in cash.entries() {
        let _ = writeln!(
            out,
            "{:<10} {:>16} {:>16}  {:<24} {}",
            start_date.advanced_by(entry.time).to_string(),
            format_credits(entry.amount),
            format_credits(entry.balance_after),
            entry.counterparty.as_deref().unwrap_or("-"),
            entry.memo
        );
    }
    let _ = writeln!(
        out,
        "{} entries, final balance {}",
        cash.entries().len(),
        format_credits(cash.balance())
    );
    out
}

pub fn all_ledgers(sim: &Simulation) -> String {
    sim.agents()
        .iter()
        .map(|agent| ledger_report(agent, sim.start_date()))
        .collect()
}

/// Each world with the ships docked there, then the ships in jump space
pub fn worlds_report(sim: &Simulation) -> String {
    let mut out = String::new();
    heading(&mut out, "WORLDS REPORT");
    for world in sim.game().worlds() {
        let present: Vec<&StarshipAgent> = sim
            .agents()
            .iter()
            .filter(|a| !a.state().is_in_jump_space() && a.ship().location() == world.name())
            .collect();
        let codes: Vec<&str> = world.trade_codes().iter().map(|c| c.code()).collect();
        let _ = writeln!(
            out,
            "{} {} {} - {} ship(s)",
            world.full_name(),
            world.uwp(),
            codes.join(" "),
            present.len()
        );
        for agent in present {
            let _ = writeln!(
                out,
                "    {} ({}) {} {}",
                agent.name(),
                agent.ship().class().class_name,
                agent.state(),
                format_credits(agent.balance())
            );
        }
    }

    let in_jump: Vec<&StarshipAgent> = sim
        .agents()
        .iter()
        .filter(|a| a.state().is_in_jump_space())
        .collect();
    let _ = writeln!(out, "\nIn jump space: {} ship(s)", in_jump.len());
    for agent in in_jump {
        let _ = writeln!(
            out,
            "    {} ({}) bound for {}",
            agent.name(),
            agent.ship().class().class_name,
            agent.ship().location()
        );
    }
    out
}
