// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::engine::alerts::{check_budget_limits, check_overspending, suppress_notified};
use crate::models::{BudgetLimit, Period, SpendingAlert};
use crate::store::{LedgerStore, SqliteStore};
use crate::utils::{date_arg_or_today, maybe_print_json, opt_arg, pretty_table};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashSet;

/// Buckets the overall monthly budget is checked against.
const OVERSPENDING_PERIODS: [Period; 3] = [Period::Day, Period::Week, Period::Month];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("check", sub)) => check(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("read", sub)) => read(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct AlertCheck {
    pub raised: Vec<SpendingAlert>,
    /// Conditions still firing but already reported.
    pub suppressed: usize,
    /// Previously raised conditions that no longer hold.
    pub resolved: usize,
}

/// Evaluate every enabled alert source for `reference`, store the alerts
/// whose condition is new, and resolve conditions that have cleared.
pub fn run_check(conn: &Connection, reference: NaiveDate) -> Result<AlertCheck> {
    let cfg = AppConfig::load(conn)?;
    let store = SqliteStore::new(conn);
    let expenses = store.load_expenses()?;

    let mut firing = Vec::new();
    if cfg.alerts.budget_limit_alerts {
        let limits = store.load_budget_limits()?;
        for period in [Period::Day, Period::Week, Period::Month, Period::Year] {
            let matching: Vec<BudgetLimit> = limits
                .iter()
                .filter(|l| l.period == period)
                .cloned()
                .collect();
            if !matching.is_empty() {
                firing.extend(check_budget_limits(&expenses, &matching, period, reference));
            }
        }
    }
    if cfg.alerts.overspending_alerts {
        for period in OVERSPENDING_PERIODS {
            firing.extend(check_overspending(&expenses, cfg.monthly_budget, period, reference));
        }
    }

    let firing_keys: HashSet<String> = firing.iter().map(|a| a.condition_key()).collect();
    let notified = store.active_alert_keys()?;
    let before = firing.len();
    let raised = suppress_notified(firing, &notified);
    store.persist_alerts(&raised)?;
    let resolved = store.resolve_cleared_alerts(&firing_keys)?;
    tracing::info!(
        raised = raised.len(),
        suppressed = before - raised.len(),
        resolved,
        %reference,
        "alert check complete"
    );
    Ok(AlertCheck {
        suppressed: before - raised.len(),
        raised,
        resolved,
    })
}

fn alert_rows(alerts: &[SpendingAlert]) -> Vec<Vec<String>> {
    alerts
        .iter()
        .map(|a| {
            vec![
                a.id.clone(),
                a.date.to_string(),
                a.severity.to_string(),
                a.title.clone(),
                a.message.clone(),
                if a.is_read { "read".into() } else { "new".into() },
            ]
        })
        .collect()
}

const HEADERS: [&str; 6] = ["Id", "Date", "Severity", "Title", "Message", "Status"];

fn check(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let reference = date_arg_or_today(sub, "as-of")?;
    let outcome = run_check(conn, reference)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &outcome.raised)? {
        return Ok(());
    }
    if outcome.raised.is_empty() {
        println!("No new alerts");
    } else {
        println!("{}", pretty_table(&HEADERS, alert_rows(&outcome.raised)));
    }
    if outcome.suppressed > 0 || outcome.resolved > 0 {
        println!(
            "{} already reported, {} cleared",
            outcome.suppressed, outcome.resolved
        );
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let alerts = SqliteStore::new(conn).load_alerts(sub.get_flag("unread"))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &alerts)? {
        println!("{}", pretty_table(&HEADERS, alert_rows(&alerts)));
    }
    Ok(())
}

fn read(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = opt_arg(sub, "id");
    if id.is_none() && !sub.get_flag("all") {
        return Err(anyhow!("Pass --id <ID> or --all"));
    }
    let n = SqliteStore::new(conn).mark_alerts_read(id.as_deref())?;
    if let Some(id) = id.as_deref().filter(|_| n == 0) {
        return Err(anyhow!("Alert '{}' not found", id));
    }
    println!("Marked {} alert(s) as read", n);
    Ok(())
}
