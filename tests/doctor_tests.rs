// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use spendlens::commands::doctor;
use spendlens::db::init_schema;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

#[test]
fn clean_database_has_no_issues() {
    let conn = setup();
    assert!(doctor::find_issues(&conn).unwrap().is_empty());
}

#[test]
fn reports_each_kind_of_inconsistency() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO budget_limits(id, category, amount, period, is_active) VALUES
            ('l1', 'Food', '100', 'month', 1),
            ('l2', 'Food', '150', 'month', 1),
            ('l3', 'Food', '10', 'day', 1),
            ('l4', 'Fuel', '50', 'month', 0);
        INSERT INTO recurring_expenses(id, title, amount, category, frequency, start_date, end_date, next_due_date, is_active)
            VALUES ('r1', 'Gym', '30', 'Health', 'weekly', '2025-01-01', '2025-01-10', '2025-01-15', 1);
        INSERT INTO savings_goals(id, name, target_amount, created_at)
            VALUES ('g1', 'Nothing', '0', '2025-01-01');
        INSERT INTO expenses(id, date, amount, category) VALUES ('e1', '2025-01-02', '-5', 'Food');
        "#,
    )
    .unwrap();

    let issues = doctor::find_issues(&conn).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(
        kinds,
        vec![
            "duplicate_active_limit",
            "recurring_past_end",
            "goal_non_positive_target",
            "negative_amount",
        ]
    );
    assert!(issues[0][1].starts_with("Food / month"));
}
