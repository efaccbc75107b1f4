// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::engine::insights::{InsightRequest, generate_insights, suppress_notified};
use crate::models::{Period, SpendingInsight};
use crate::store::{LedgerStore, SqliteStore};
use crate::utils::{date_arg_or_today, maybe_print_json, pretty_table, req_arg};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::HashSet;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("generate", sub)) => generate(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Generate insights for the bucket around `reference` and store those
/// whose condition was not already reported. `None` when insights are
/// switched off.
pub fn run_generate(
    conn: &Connection,
    period: Period,
    reference: NaiveDate,
) -> Result<Option<Vec<SpendingInsight>>> {
    let cfg = AppConfig::load(conn)?;
    if !cfg.alerts.weekly_insights {
        tracing::debug!("insights disabled by settings");
        return Ok(None);
    }
    let store = SqliteStore::new(conn);
    let expenses = store.load_expenses()?;
    let incomes = store.load_incomes()?;
    let categories = store.load_categories()?;
    let limits = store.load_budget_limits()?;
    let goals = if cfg.alerts.savings_goal_alerts {
        store.load_savings_goals()?
    } else {
        Vec::new()
    };

    let all = generate_insights(&InsightRequest {
        expenses: &expenses,
        incomes: &incomes,
        categories: &categories,
        period,
        reference,
        limits: &limits,
        goals: &goals,
    });
    let firing: HashSet<String> = all.iter().map(|i| i.condition_key(period)).collect();
    let notified = store.active_insight_keys(period)?;
    let fresh = suppress_notified(all, period, &notified);
    store.persist_insights(&fresh, period)?;
    let resolved = store.resolve_cleared_insights(&firing, period)?;
    tracing::info!(stored = fresh.len(), resolved, %period, %reference, "insights generated");
    Ok(Some(fresh))
}

fn insight_rows(insights: &[SpendingInsight]) -> Vec<Vec<String>> {
    insights
        .iter()
        .map(|i| {
            vec![
                i.date.to_string(),
                i.severity.to_string(),
                i.title.clone(),
                i.message.clone(),
                i.percentage.map(|p| format!("{}%", p)).unwrap_or_default(),
            ]
        })
        .collect()
}

const HEADERS: [&str; 5] = ["Date", "Severity", "Title", "Message", "Change"];

fn generate(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period: Period = req_arg(sub, "period")?.parse()?;
    let reference = date_arg_or_today(sub, "as-of")?;
    let Some(fresh) = run_generate(conn, period, reference)? else {
        println!("Insights are turned off (config set weekly_insights true)");
        return Ok(());
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &fresh)? {
        if fresh.is_empty() {
            println!("Nothing new this {}", period);
        } else {
            println!("{}", pretty_table(&HEADERS, insight_rows(&fresh)));
        }
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let insights = SqliteStore::new(conn).load_insights(sub.get_flag("unread"))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &insights)? {
        println!("{}", pretty_table(&HEADERS, insight_rows(&insights)));
    }
    Ok(())
}
