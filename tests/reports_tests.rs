// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use spendlens::cli;
use spendlens::commands::{expenses, reports};
use spendlens::db::init_schema;
use spendlens::models::{Expense, Income, Period};
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
    store
        .add_income(&Income::new("i1", Decimal::from(1000), "Salary", d(2025, 8, 1)))
        .unwrap();
    conn
}

#[test]
fn monthly_summary_splits_by_category_and_source() {
    let conn = setup();
    let report = reports::build_summary(&conn, Period::Month, d(2025, 8, 20)).unwrap();
    assert_eq!(report.start, d(2025, 8, 1));
    assert_eq!(report.end, d(2025, 8, 31));
    assert_eq!(report.totals.total_income, Decimal::from(1000));
    assert_eq!(report.totals.total_expenses, Decimal::from(200));
    assert_eq!(report.totals.net_savings, Decimal::from(800));
    assert_eq!(report.totals.savings_rate, Decimal::from(80));
    assert_eq!(report.expense_count, 2);
    assert_eq!(report.skipped, 0);

    let cats: Vec<(&str, Decimal)> = report
        .by_category
        .iter()
        .map(|c| (c.category.as_str(), c.percentage))
        .collect();
    assert_eq!(cats, vec![("Food", Decimal::from(75)), ("Travel", Decimal::from(25))]);
    assert_eq!(report.by_source[0].category, "Salary");
}

#[test]
fn negative_rows_are_counted_as_skipped() {
    let conn = setup();
    conn.execute(
        "INSERT INTO expenses(id, date, amount, category) VALUES ('neg', '2025-08-15', '-20', 'Food')",
        [],
    )
    .unwrap();
    let report = reports::build_summary(&conn, Period::Month, d(2025, 8, 20)).unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.totals.total_expenses, Decimal::from(200));
}

#[test]
fn expense_list_filters_by_category_newest_first() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "spendlens", "expense", "list", "--category", " Food ", "--json",
    ]);
    let Some(("expense", exp_m)) = matches.subcommand() else {
        panic!("expense command not parsed");
    };
    let Some(("list", list_m)) = exp_m.subcommand() else {
        panic!("list not parsed");
    };
    let rows = expenses::query_rows(&conn, list_m).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-08-10");
    assert_eq!(rows[1].date, "2025-07-10");
}
