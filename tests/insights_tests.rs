// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use spendlens::commands::insights;
use spendlens::config::AppConfig;
use spendlens::db::init_schema;
use spendlens::models::{Expense, Income, InsightType, Period, SavingsGoal, Severity};
use spendlens::store::SqliteStore;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    let store = SqliteStore::new(&conn);
    for (id, amount, category, date) in [
        ("e1", 100, "Food", d(2025, 7, 10)),
        ("e2", 150, "Food", d(2025, 8, 10)),
        ("e3", 50, "Travel", d(2025, 8, 12)),
    ] {
        store
            .add_expense(&Expense::new(id, Decimal::from(amount), category, date))
            .unwrap();
    }
    conn
}

#[test]
fn month_over_month_insights_are_stored_once() {
    let conn = setup();
    let today = d(2025, 8, 20);

    let fresh = insights::run_generate(&conn, Period::Month, today)
        .unwrap()
        .unwrap();
    assert_eq!(fresh.len(), 2);

    let increase = fresh
        .iter()
        .find(|i| i.insight_type == InsightType::SpendingIncrease)
        .unwrap();
    assert_eq!(increase.category.as_deref(), Some("Food"));
    assert_eq!(increase.percentage, Some(Decimal::from(50)));
    assert_eq!(increase.severity, Severity::Medium);

    let dominant = fresh
        .iter()
        .find(|i| i.insight_type == InsightType::BudgetAlert)
        .unwrap();
    assert_eq!(dominant.percentage, Some(Decimal::from(75)));

    let repeat = insights::run_generate(&conn, Period::Month, today)
        .unwrap()
        .unwrap();
    assert!(repeat.is_empty());
    assert_eq!(SqliteStore::new(&conn).load_insights(false).unwrap().len(), 2);
}

#[test]
fn an_empty_period_yields_nothing() {
    let conn = setup();
    let fresh = insights::run_generate(&conn, Period::Month, d(2025, 10, 1))
        .unwrap()
        .unwrap();
    assert!(fresh.is_empty());
}

#[test]
fn insights_can_be_switched_off() {
    let conn = setup();
    AppConfig::set(&conn, "weekly_insights", "false").unwrap();
    assert!(insights::run_generate(&conn, Period::Month, d(2025, 8, 20))
        .unwrap()
        .is_none());
}

#[test]
fn a_goal_at_risk_is_not_hidden_by_an_earlier_all_clear() {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    let store = SqliteStore::new(&conn);
    for (id, amount, category) in [("a", 30, "Food"), ("b", 35, "Rent"), ("c", 35, "Fun")] {
        store
            .add_expense(&Expense::new(id, Decimal::from(amount), category, d(2025, 8, 2)))
            .unwrap();
    }
    let today = d(2025, 8, 15);

    let first = insights::run_generate(&conn, Period::Month, today)
        .unwrap()
        .unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].insight_type, InsightType::SavingsTip);
    assert_eq!(first[0].condition, "healthy");

    store
        .add_income(&Income::new("i", Decimal::from(700), "Salary", d(2025, 8, 1)))
        .unwrap();
    store
        .add_goal(&SavingsGoal {
            id: "laptop".into(),
            name: "Laptop".into(),
            target_amount: Decimal::from(1000),
            current_amount: Decimal::ZERO,
            target_date: Some(d(2025, 8, 25)),
            created_at: d(2025, 5, 7),
            is_completed: false,
            completed_at: None,
        })
        .unwrap();

    let second = insights::run_generate(&conn, Period::Month, today)
        .unwrap()
        .unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].insight_type, InsightType::SavingsTip);
    assert_eq!(second[0].condition, "goal:laptop");
    assert_eq!(second[0].title, "Savings Goal: Laptop");

    let stored = store.load_insights(false).unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().any(|i| i.condition == "goal:laptop"));
}

#[test]
fn a_new_month_reports_the_same_condition_again() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let august = insights::run_generate(&conn, Period::Month, d(2025, 8, 20))
        .unwrap()
        .unwrap();
    assert!(august.iter().any(|i| i.condition == "top:Food"));

    store
        .add_expense(&Expense::new("e4", Decimal::from(90), "Food", d(2025, 9, 3)))
        .unwrap();
    store
        .add_expense(&Expense::new("e5", Decimal::from(10), "Travel", d(2025, 9, 3)))
        .unwrap();
    let september = insights::run_generate(&conn, Period::Month, d(2025, 9, 10))
        .unwrap()
        .unwrap();
    let top = september
        .iter()
        .find(|i| i.condition == "top:Food")
        .unwrap();
    assert_eq!(top.percentage, Some(Decimal::from(90)));
}
