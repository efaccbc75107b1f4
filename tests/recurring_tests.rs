// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use spendlens::cli;
use spendlens::commands::recurring;
use spendlens::db::init_schema;
use spendlens::store::{LedgerStore, SqliteStore};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn cmd(conn: &Connection, args: &[&str]) {
    let mut argv = vec!["spendlens", "recurring"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("recurring", sub)) = matches.subcommand() {
        recurring::handle(conn, sub).unwrap();
    } else {
        panic!("recurring command not parsed");
    }
}

#[test]
fn month_end_rent_clamps_and_catches_up_one_cycle_per_run() {
    let conn = setup();
    cmd(&conn, &[
        "add", "--title", " Rent ", "--amount", "1200", "--category", "Housing",
        "--frequency", "monthly", "--start", "2025-01-31",
    ]);
    let store = SqliteStore::new(&conn);

    let created = recurring::run_due(&conn, d(2025, 1, 31)).unwrap();
    assert_eq!(created.len(), 1);
    let e = &created[0];
    assert_eq!(e.date, d(2025, 1, 31));
    assert!(e.is_recurring);
    assert_eq!(e.note.as_deref(), Some("Rent"));
    let def = &store.load_recurring_definitions().unwrap()[0];
    assert_eq!(e.recurring_id.as_deref(), Some(def.id.as_str()));
    assert_eq!(def.next_due_date, d(2025, 2, 28));

    // same day again: nothing due
    assert!(recurring::run_due(&conn, d(2025, 1, 31)).unwrap().is_empty());

    // late run: one instance dated today, schedule moves from the old due date
    let late = recurring::run_due(&conn, d(2025, 3, 5)).unwrap();
    assert_eq!(late.len(), 1);
    assert_eq!(late[0].date, d(2025, 3, 5));
    assert_eq!(
        store.load_recurring_definitions().unwrap()[0].next_due_date,
        d(2025, 3, 28)
    );
    assert_eq!(store.load_expenses().unwrap().len(), 2);
}

#[test]
fn paused_and_ended_definitions_stay_quiet() {
    let conn = setup();
    cmd(&conn, &[
        "add", "--title", "Gym", "--amount", "30", "--category", "Health",
        "--frequency", "weekly", "--start", "2025-01-01", "--end", "2025-01-10",
    ]);
    let store = SqliteStore::new(&conn);
    assert_eq!(recurring::run_due(&conn, d(2025, 1, 1)).unwrap().len(), 1);
    assert_eq!(recurring::run_due(&conn, d(2025, 1, 8)).unwrap().len(), 1);
    assert!(recurring::run_due(&conn, d(2025, 1, 20)).unwrap().is_empty());
    assert_eq!(
        store.load_recurring_definitions().unwrap()[0].next_due_date,
        d(2025, 1, 15)
    );

    cmd(&conn, &[
        "add", "--title", "Paper", "--amount", "5", "--category", "News",
        "--frequency", "daily", "--start", "2025-02-01",
    ]);
    let paper = store
        .load_recurring_definitions()
        .unwrap()
        .into_iter()
        .find(|d| d.title == "Paper")
        .unwrap();
    cmd(&conn, &["pause", "--id", &paper.id]);
    assert!(recurring::run_due(&conn, d(2025, 2, 3)).unwrap().is_empty());
    cmd(&conn, &["resume", "--id", &paper.id]);
    assert_eq!(recurring::run_due(&conn, d(2025, 2, 3)).unwrap().len(), 1);
}

#[test]
fn run_command_accepts_a_reference_day() {
    let conn = setup();
    cmd(&conn, &[
        "add", "--title", "Netflix", "--amount", "199", "--category", "Entertainment",
        "--frequency", "monthly", "--start", "2025-06-15",
    ]);
    cmd(&conn, &["run", "--as-of", "2025-06-15", "--json"]);
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM expenses WHERE is_recurring=1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
    let category: String = conn
        .query_row("SELECT name FROM categories", [], |r| r.get(0))
        .unwrap();
    assert_eq!(category, "Entertainment");
}
