//! Tests for the simulation clock and the Traveller calendar

use t5sim_core::{Clock, TravellerDate};

#[test]
fn test_tasks_wake_in_time_order() {
    let mut clock = Clock::new();
    clock.schedule(5.0, "late");
    clock.schedule(1.0, "early");
    clock.schedule(3.0, "middle");

    let mut woken = Vec::new();
    clock
        .run(10.0, |now, task| {
            woken.push((now, *task));
            Ok::<_, ()>(None)
        })
        .unwrap();

    assert_eq!(woken, vec![(1.0, "early"), (3.0, "middle"), (5.0, "late")]);
    assert_eq!(clock.now(), 10.0);
    assert_eq!(clock.pending(), 0);
}

#[test]
fn test_coinciding_wakeups_keep_schedule_order() {
    let mut clock = Clock::new();
    for ship in ["Trader_003", "Trader_001", "Trader_002"] {
        clock.schedule(2.0, ship);
    }
    let mut order = Vec::new();
    clock
        .run(3.0, |_, ship| {
            order.push(*ship);
            Ok::<_, ()>(None)
        })
        .unwrap();
    assert_eq!(order, vec!["Trader_003", "Trader_001", "Trader_002"]);
}

#[test]
fn test_rescheduled_task_repeats_until_horizon() {
    let mut clock = Clock::new();
    clock.schedule(0.0, ());
    let mut wakeups = Vec::new();
    clock
        .run(10.0, |now, _| {
            wakeups.push(now);
            Ok::<_, ()>(Some(3.0))
        })
        .unwrap();

    // 0, 3, 6, 9; the wake-up at 12 stays queued
    assert_eq!(wakeups, vec![0.0, 3.0, 6.0, 9.0]);
    assert_eq!(clock.pending(), 1);
    assert_eq!(clock.peek_time(), Some(12.0));
}

#[test]
fn test_wakeup_at_horizon_is_not_run() {
    let mut clock = Clock::new();
    clock.schedule(5.0, ());
    let mut ran = false;
    clock
        .run(5.0, |_, _| {
            ran = true;
            Ok::<_, ()>(None)
        })
        .unwrap();
    assert!(!ran);
    assert_eq!(clock.pending(), 1);
}

#[test]
fn test_run_continues_across_calls() {
    let mut clock = Clock::new();
    clock.schedule(0.0, 0u32);
    let mut count = 0;
    clock
        .run(4.0, |_, _| {
            count += 1;
            Ok::<_, ()>(Some(1.0))
        })
        .unwrap();
    assert_eq!(count, 4);
    clock
        .run(8.0, |_, _| {
            count += 1;
            Ok::<_, ()>(Some(1.0))
        })
        .unwrap();
    assert_eq!(count, 8);
    assert_eq!(clock.now(), 8.0);
}

#[test]
fn test_error_stops_the_run() {
    let mut clock = Clock::new();
    clock.schedule(1.0, 1);
    clock.schedule(2.0, 2);
    let result = clock.run(10.0, |now, task| {
        if *task == 1 {
            Err(format!("failed at {}", now))
        } else {
            Ok(None)
        }
    });
    assert_eq!(result, Err("failed at 1".to_string()));
    assert_eq!(clock.now(), 1.0);
    assert_eq!(clock.pending(), 1);
}

// ============================================================================
// Calendar
// ============================================================================

#[test]
fn test_date_display_is_zero_padded() {
    assert_eq!(TravellerDate::new(5, 1105).to_string(), "005-1105");
    assert_eq!(TravellerDate::new(360, 1104).to_string(), "360-1104");
}

#[test]
fn test_advancing_rolls_over_the_year() {
    let start = TravellerDate::new(360, 1104);
    assert_eq!(start.advanced_by(4.9), TravellerDate::new(364, 1104));
    assert_eq!(start.advanced_by(5.0), TravellerDate::new(365, 1104));
    assert_eq!(start.advanced_by(6.0), TravellerDate::new(1, 1105));
    assert_eq!(start.advanced_by(7.5), TravellerDate::new(2, 1105));
    assert_eq!(start.advanced_by(371.0), TravellerDate::new(1, 1106));
}

#[test]
fn test_months_and_holiday() {
    assert_eq!(TravellerDate::new(1, 1105).month(), None);
    assert!(TravellerDate::new(1, 1105).is_holiday());
    assert_eq!(TravellerDate::new(2, 1105).month(), Some(1));
    assert_eq!(TravellerDate::new(29, 1105).month(), Some(1));
    assert_eq!(TravellerDate::new(30, 1105).month(), Some(2));
    assert_eq!(TravellerDate::new(338, 1105).month(), Some(13));
    assert_eq!(TravellerDate::new(365, 1105).month(), Some(13));

    for month in 1..=13u32 {
        let start = 2 + 28 * (month - 1);
        assert!(TravellerDate::new(start, 1105).is_month_start());
    }
}

#[test]
fn test_days_until_next_month() {
    assert_eq!(TravellerDate::new(2, 1105).days_until_next_month(), 0);
    assert_eq!(TravellerDate::new(3, 1105).days_until_next_month(), 27);
    assert_eq!(TravellerDate::new(1, 1105).days_until_next_month(), 1);
    assert_eq!(TravellerDate::new(360, 1104).days_until_next_month(), 7);
    assert_eq!(TravellerDate::new(365, 1104).days_until_next_month(), 2);
}

#[test]
fn test_days_until_following_month() {
    assert_eq!(TravellerDate::new(2, 1105).days_until_following_month(), 28);
    assert_eq!(TravellerDate::new(338, 1105).days_until_following_month(), 29);
    assert_eq!(TravellerDate::new(310, 1105).days_until_following_month(), 28);
}
