// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendlens::config::AppConfig;
use spendlens::db::{db_path, open_at};
use spendlens::models::Expense;
use spendlens::store::{LedgerStore, SqliteStore};

#[test]
fn data_survives_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("spend.sqlite");
    let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();

    {
        let conn = open_at(&path).unwrap();
        SqliteStore::new(&conn)
            .add_expense(&Expense::new("e1", Decimal::new(1999, 2), "Food", date))
            .unwrap();
        AppConfig::set(&conn, "currency", "$").unwrap();
    }

    let conn = open_at(&path).unwrap();
    let expenses = SqliteStore::new(&conn).load_expenses().unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].amount, Decimal::new(1999, 2));
    assert_eq!(AppConfig::load(&conn).unwrap().currency, "$");
}

#[test]
fn explicit_path_wins_over_default() {
    let p = db_path(Some(" /tmp/spendlens-test.sqlite ")).unwrap();
    assert_eq!(p.to_str(), Some("/tmp/spendlens-test.sqlite"));
}
