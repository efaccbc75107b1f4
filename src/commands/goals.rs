// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::insights::{GoalProgress, savings_goal_progress};
use crate::models::SavingsGoal;
use crate::store::{LedgerStore, SqliteStore};
use crate::utils::{
    date_arg_or_today, maybe_print_json, new_id, opt_arg, parse_amount, parse_date, pretty_table,
    req_arg,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("contribute", sub)) => contribute(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = req_arg(sub, "name")?;
    let target = parse_amount(&req_arg(sub, "target")?)?;
    let today = date_arg_or_today(sub, "as-of")?;
    let target_date = opt_arg(sub, "by").map(|s| parse_date(&s)).transpose()?;
    if target_date.is_some_and(|d| d < today) {
        return Err(anyhow!("Target date must not be in the past"));
    }
    let goal = SavingsGoal {
        id: new_id(),
        name,
        target_amount: target,
        current_amount: Decimal::ZERO,
        target_date,
        created_at: today,
        is_completed: false,
        completed_at: None,
    };
    SqliteStore::new(conn).add_goal(&goal)?;
    tracing::info!(id = %goal.id, %target, "savings goal created");
    println!("Goal '{}' created with target {} (id: {})", goal.name, target, goal.id);
    Ok(())
}

fn contribute(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let amount = parse_amount(&req_arg(sub, "amount")?)?;
    let today = date_arg_or_today(sub, "as-of")?;
    let goal = SqliteStore::new(conn).contribute_goal(&id, amount, today)?;
    if goal.is_completed {
        println!("Goal '{}' reached: {} saved", goal.name, goal.current_amount);
    } else {
        println!(
            "Goal '{}': {} of {} saved",
            goal.name, goal.current_amount, goal.target_amount
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct GoalRow {
    #[serde(flatten)]
    pub goal: SavingsGoal,
    #[serde(flatten)]
    pub progress: GoalProgress,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = date_arg_or_today(sub, "as-of")?;
    let store = SqliteStore::new(conn);
    let incomes = store.load_incomes()?;
    let expenses = store.load_expenses()?;
    let data: Vec<GoalRow> = store
        .load_savings_goals()?
        .into_iter()
        .map(|goal| GoalRow {
            progress: savings_goal_progress(&goal, &incomes, &expenses, today),
            goal,
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.goal.id.clone(),
                    r.goal.name.clone(),
                    format!("{:.2} / {:.2}", r.goal.current_amount, r.goal.target_amount),
                    format!("{:.1}%", r.progress.progress),
                    r.goal
                        .target_date
                        .map(|d| format!("{} ({} days)", d, r.progress.days_left))
                        .unwrap_or_else(|| "-".into()),
                    if r.goal.is_completed {
                        "done".into()
                    } else if r.progress.is_on_track {
                        "on track".into()
                    } else {
                        "behind".into()
                    },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Name", "Saved", "Progress", "Target date", "Status"], rows)
        );
    }
    Ok(())
}
