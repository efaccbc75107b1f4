// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::aggregate::{percent_of, summarize};
use crate::models::Period;
use crate::store::{LedgerStore, SqliteStore};
use crate::utils::{date_arg_or_today, maybe_print_json, parse_amount, pretty_table, req_arg};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let category = req_arg(sub, "category")?;
    let amount = parse_amount(&req_arg(sub, "amount")?)?;
    let period: Period = req_arg(sub, "period")?.parse()?;
    let id = SqliteStore::new(conn).upsert_limit(&category, amount, period)?;
    tracing::info!(%id, %category, %amount, %period, "budget limit set");
    println!("Limit set for {} / {} = {} (id: {})", category, period, amount, id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    if !SqliteStore::new(conn).delete_limit(&id)? {
        return Err(anyhow!("Limit '{}' not found", id));
    }
    println!("Deleted limit {}", id);
    Ok(())
}

#[derive(Serialize)]
pub struct LimitRow {
    pub id: String,
    pub category: String,
    pub period: Period,
    pub limit: Decimal,
    pub spent: Decimal,
    pub percent_used: Option<Decimal>,
    pub is_active: bool,
}

/// Each limit with what has been spent against it in the bucket around `as-of`.
pub fn limit_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<LimitRow>> {
    let reference = date_arg_or_today(sub, "as-of")?;
    let store = SqliteStore::new(conn);
    let expenses = store.load_expenses()?;
    let rows = store
        .load_budget_limits()?
        .into_iter()
        .map(|l| {
            let spent = summarize(&expenses, l.period, reference).category_total(&l.category);
            LimitRow {
                percent_used: percent_of(spent, l.amount).map(|p| p.round_dp(1)),
                id: l.id,
                category: l.category,
                period: l.period,
                limit: l.amount,
                spent,
                is_active: l.is_active,
            }
        })
        .collect();
    Ok(rows)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = limit_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.category.clone(),
                    r.period.to_string(),
                    format!("{:.2}", r.limit),
                    format!("{:.2}", r.spent),
                    r.percent_used
                        .map(|p| format!("{}%", p))
                        .unwrap_or_else(|| "-".into()),
                    if r.is_active { "yes".into() } else { "no".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Category", "Period", "Limit", "Spent", "Used", "Active"],
                rows
            )
        );
    }
    Ok(())
}
