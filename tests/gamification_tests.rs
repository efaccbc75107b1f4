// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Days, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use spendlens::commands::{achievements, streaks};
use spendlens::db::init_schema;
use spendlens::models::Expense;
use spendlens::store::{LedgerStore, SqliteStore};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// One expense a day from Aug 1 to Aug 7 2025.
fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    let store = SqliteStore::new(&conn);
    for i in 0..7u64 {
        let date = d(2025, 8, 1).checked_add_days(Days::new(i)).unwrap();
        store
            .add_expense(&Expense::new(format!("e{}", i), Decimal::from(20), "Food", date))
            .unwrap();
    }
    conn
}

#[test]
fn streak_snapshot_is_persisted() {
    let conn = setup();
    let data = streaks::refresh(&conn, d(2025, 8, 7)).unwrap();
    assert_eq!(data.current_streak, 7);
    assert_eq!(data.longest_streak, 7);
    assert_eq!(data.last_spend_date, Some(d(2025, 8, 7)));
    assert_eq!(data.total_no_spend_days, 0);
    assert_eq!(SqliteStore::new(&conn).load_streak_data().unwrap(), data);
}

#[test]
fn achievements_unlock_once_and_stay_unlocked() {
    let conn = setup();
    let (all, unlocked) = achievements::run_check(&conn, d(2025, 8, 7)).unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(unlocked, vec!["first-steps".to_string()]);
    let first = all.iter().find(|a| a.id == "first-steps").unwrap();
    assert_eq!(first.unlocked_at, Some(d(2025, 8, 7)));

    // two quiet days break the streak and earn the no-spend badge
    let (all, unlocked) = achievements::run_check(&conn, d(2025, 8, 9)).unwrap();
    assert_eq!(unlocked, vec!["no-spend-day".to_string()]);
    let first = all.iter().find(|a| a.id == "first-steps").unwrap();
    assert!(first.is_unlocked);
    assert_eq!(first.unlocked_at, Some(d(2025, 8, 7)));

    let stored = SqliteStore::new(&conn).load_achievements().unwrap();
    assert_eq!(stored.iter().filter(|a| a.is_unlocked).count(), 2);
}

#[test]
fn budget_master_waits_for_a_monthly_budget() {
    let conn = setup();
    let (all, _) = achievements::run_check(&conn, d(2025, 8, 7)).unwrap();
    let master = all.iter().find(|a| a.id == "budget-master").unwrap();
    assert_eq!(master.progress, Decimal::ZERO);

    spendlens::config::AppConfig::set(&conn, "monthly_budget", "3000").unwrap();
    let (all, _) = achievements::run_check(&conn, d(2025, 8, 7)).unwrap();
    let master = all.iter().find(|a| a.id == "budget-master").unwrap();
    assert_eq!(master.progress, Decimal::from(7));
    assert!(!master.is_unlocked);
}
