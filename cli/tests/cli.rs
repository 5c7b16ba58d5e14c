use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn t5sim() -> Command {
    Command::cargo_bin("t5sim").unwrap()
}

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("t5sim-{}-{}", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_short_run_prints_summary() {
    t5sim()
        .args(["--ships", "3", "--days", "30", "--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("T5SIM - Traveller 5 Trading Simulation"))
        .stdout(predicate::str::contains("Ships: 3"))
        .stdout(predicate::str::contains("SIMULATION RESULTS"))
        .stdout(predicate::str::contains("Total voyages completed:"))
        .stdout(predicate::str::contains("Average per ship:"));
}

#[test]
fn test_same_seed_same_output() {
    let run = || {
        t5sim()
            .args(["--ships", "4", "--days", "60", "--seed", "9", "--include-civilian"])
            .output()
            .unwrap()
    };
    let first = String::from_utf8(run().stdout).unwrap();
    let second = String::from_utf8(run().stdout).unwrap();
    let strip = |s: &str| {
        s.lines()
            .filter(|l| !l.starts_with("Simulation time:"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(strip(&first), strip(&second));
}

#[test]
fn test_ledger_for_one_ship() {
    t5sim()
        .args(["--ships", "2", "--days", "10", "--ledger", "Trader_001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LEDGER: Trader_001 - Cash"))
        .stdout(predicate::str::contains("Initial capitalization"));
}

#[test]
fn test_unknown_ledger_ship_is_reported() {
    t5sim()
        .args(["--ships", "1", "--days", "5", "--ledger", "Trader_999"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ship not found: Trader_999"));
}

#[test]
fn test_worlds_report() {
    t5sim()
        .args(["--ships", "2", "--days", "5", "--worlds-report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WORLDS REPORT"))
        .stdout(predicate::str::contains("Rhylanor (Rhylanor 2716)"));
}

#[test]
fn test_bad_frequencies_exit_nonzero() {
    let ships = scratch_file(
        "bad-frequencies.json",
        r#"[{
            "class_name": "Free Trader",
            "role": "civilian",
            "frequency": 0.5,
            "ship_cost": 37.08,
            "jump_rating": 1,
            "maneuver_rating": 1,
            "cargo_capacity": 82,
            "staterooms": 10,
            "low_berths": 20,
            "crew_positions": "0ACDE",
            "jump_fuel_capacity": 20,
            "ops_fuel_capacity": 2,
            "can_refine_fuel": false
        }]"#,
    );
    t5sim()
        .arg("--ships-file")
        .arg(&ships)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Frequency totals invalid: role 'civilian' sums to 0.50 (expected 1.00)",
        ));
    let _ = std::fs::remove_file(ships);
}

#[test]
fn test_bad_starting_day_exit_nonzero() {
    t5sim()
        .args(["--day", "400"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("starting_day"));
}

#[test]
fn test_missing_map_file_exit_nonzero() {
    t5sim()
        .args(["--map", "/nonexistent/t5sim/map.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading map file"));
}
