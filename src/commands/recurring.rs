// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::recurring::{is_expired, materialize_due};
use crate::models::{Expense, Frequency, PaymentMethod, RecurringExpense};
use crate::store::{LedgerStore, SqliteStore};
use crate::utils::{
    date_arg_or_today, maybe_print_json, new_id, opt_arg, parse_amount, parse_date, pretty_table,
    req_arg, today,
};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pause", sub)) => set_active(conn, sub, false)?,
        Some(("resume", sub)) => set_active(conn, sub, true)?,
        Some(("run", sub)) => run(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let title = req_arg(sub, "title")?;
    let amount = parse_amount(&req_arg(sub, "amount")?)?;
    let category = req_arg(sub, "category")?;
    let frequency: Frequency = req_arg(sub, "frequency")?.parse()?;
    let start = match opt_arg(sub, "start") {
        Some(s) => parse_date(&s)?,
        None => today(),
    };
    let end = opt_arg(sub, "end").map(|s| parse_date(&s)).transpose()?;
    if let Some(e) = end.filter(|e| *e < start) {
        return Err(anyhow!("End date {} is before start date {}", e, start));
    }
    let def = RecurringExpense {
        id: new_id(),
        title,
        amount,
        category,
        frequency,
        start_date: start,
        end_date: end,
        next_due_date: start,
        is_active: true,
        note: opt_arg(sub, "note"),
        payment_method: opt_arg(sub, "payment")
            .map(|p| p.parse::<PaymentMethod>().map_err(|e| anyhow!(e)))
            .transpose()?,
    };
    SqliteStore::new(conn).add_recurring(&def)?;
    tracing::info!(id = %def.id, %frequency, "recurring definition added");
    println!(
        "Recurring '{}' ({} {}) first due {} (id: {})",
        def.title, def.amount, frequency, def.next_due_date, def.id
    );
    Ok(())
}

fn set_active(conn: &Connection, sub: &clap::ArgMatches, active: bool) -> Result<()> {
    let id = req_arg(sub, "id")?;
    if !SqliteStore::new(conn).set_recurring_active(&id, active)? {
        return Err(anyhow!("Recurring definition '{}' not found", id));
    }
    println!(
        "Recurring {} {}",
        id,
        if active { "resumed" } else { "paused" }
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = SqliteStore::new(conn).load_recurring_definitions()?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|d| {
                let status = if !d.is_active {
                    "paused"
                } else if is_expired(d) {
                    "ended"
                } else {
                    "active"
                };
                vec![
                    d.id.clone(),
                    d.title.clone(),
                    d.category.clone(),
                    format!("{:.2}", d.amount),
                    d.frequency.to_string(),
                    d.next_due_date.to_string(),
                    d.end_date.map(|e| e.to_string()).unwrap_or_default(),
                    status.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Title", "Category", "Amount", "Frequency", "Next due", "Ends", "Status"],
                rows,
            )
        );
    }
    Ok(())
}

/// Generate one instance per due definition and store each with its
/// advanced definition in a single transaction.
pub fn run_due(conn: &Connection, today: NaiveDate) -> Result<Vec<Expense>> {
    let store = SqliteStore::new(conn);
    let defs = store.load_recurring_definitions()?;
    let outcome = materialize_due(&defs, today);
    for (id, err) in &outcome.failed {
        tracing::warn!(%id, error = %err, "recurring definition skipped");
    }
    store.persist_recurring_run(&outcome.generated)?;
    tracing::info!(
        generated = outcome.generated.len(),
        failed = outcome.failed.len(),
        %today,
        "recurring run complete"
    );
    Ok(outcome.generated.into_iter().map(|(e, _)| e).collect())
}

fn run(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = date_arg_or_today(sub, "as-of")?;
    let created = run_due(conn, today)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &created)? {
        if created.is_empty() {
            println!("No recurring expenses due on {}", today);
            return Ok(());
        }
        let rows = created
            .iter()
            .map(|e| {
                vec![
                    e.id.clone(),
                    e.date.to_string(),
                    e.category.clone(),
                    format!("{:.2}", e.amount),
                    e.note.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Id", "Date", "Category", "Amount", "Note"], rows));
    }
    Ok(())
}
