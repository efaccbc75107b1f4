// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::recurring::is_expired;
use crate::store::{LedgerStore, SqliteStore};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

/// Issue name and detail for every inconsistency found.
pub fn find_issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) More than one active limit for the same category and period
    let mut stmt = conn.prepare(
        "SELECT category, period, COUNT(*) FROM budget_limits WHERE is_active=1
         GROUP BY category, period HAVING COUNT(*) > 1 ORDER BY category, period",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let category: String = r.get(0)?;
        let period: String = r.get(1)?;
        let n: i64 = r.get(2)?;
        rows.push(vec![
            "duplicate_active_limit".into(),
            format!("{} / {} ({} rows)", category, period, n),
        ]);
    }

    let store = SqliteStore::new(conn);

    // 2) Recurring definitions that can never fire again
    for def in store.load_recurring_definitions()? {
        if def.is_active && is_expired(&def) {
            rows.push(vec![
                "recurring_past_end".into(),
                format!(
                    "{} '{}' next due {} after end {}",
                    def.id,
                    def.title,
                    def.next_due_date,
                    def.end_date.map(|d| d.to_string()).unwrap_or_default()
                ),
            ]);
        }
    }

    // 3) Goals nobody can reach
    for goal in store.load_savings_goals()? {
        if goal.target_amount <= Decimal::ZERO {
            rows.push(vec![
                "goal_non_positive_target".into(),
                format!("{} '{}' target {}", goal.id, goal.name, goal.target_amount),
            ]);
        }
    }

    // 4) Negative amounts are left out of every computation
    for table in ["expenses", "incomes"] {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, amount FROM {} WHERE CAST(amount AS REAL) < 0 ORDER BY date",
            table
        ))?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let id: String = r.get(0)?;
            let amount: String = r.get(1)?;
            rows.push(vec![
                "negative_amount".into(),
                format!("{} {} amount {}", table, id, amount),
            ]);
        }
    }

    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = find_issues(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        tracing::warn!(issues = rows.len(), "doctor found problems");
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
