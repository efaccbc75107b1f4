// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::engine::aggregate::{
    FinancialSummary, calendar_month, chart_series, financial_summary, percent_of, summarize,
};
use crate::engine::period::date_range;
use crate::models::Period;
use crate::store::{LedgerStore, SqliteStore};
use crate::utils::{
    date_arg_or_today, fmt_money, maybe_print_json, parse_date, parse_month, pretty_table, req_arg,
};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("chart", sub)) => chart(conn, sub)?,
        Some(("calendar", sub)) => calendar(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    pub percentage: Decimal,
}

#[derive(Serialize)]
pub struct SummaryReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(flatten)]
    pub totals: FinancialSummary,
    pub by_category: Vec<CategoryShare>,
    pub by_source: Vec<CategoryShare>,
    pub expense_count: usize,
    pub skipped: usize,
}

pub fn build_summary(conn: &Connection, period: Period, reference: NaiveDate) -> Result<SummaryReport> {
    let store = SqliteStore::new(conn);
    let expenses = store.load_expenses()?;
    let incomes = store.load_incomes()?;
    let spent = summarize(&expenses, period, reference);
    let earned = summarize(&incomes, period, reference);
    for r in spent.rejected.iter().chain(earned.rejected.iter()) {
        tracing::warn!(id = %r.id, reason = %r.reason, "record left out of summary");
    }
    let shares = |map: &std::collections::BTreeMap<String, Decimal>, total: Decimal| {
        let mut v: Vec<CategoryShare> = map
            .iter()
            .map(|(k, amount)| CategoryShare {
                category: k.clone(),
                amount: *amount,
                percentage: percent_of(*amount, total)
                    .unwrap_or(Decimal::ZERO)
                    .round_dp(1),
            })
            .collect();
        v.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
        v
    };
    let (start, end) = date_range(period, reference);
    Ok(SummaryReport {
        start,
        end,
        totals: financial_summary(&expenses, &incomes, period, reference),
        by_category: shares(&spent.by_category, spent.total),
        by_source: shares(&earned.by_category, earned.total),
        expense_count: spent.count,
        skipped: spent.rejected.len() + earned.rejected.len(),
    })
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period: Period = req_arg(sub, "period")?.parse()?;
    let reference = date_arg_or_today(sub, "as-of")?;
    let report = build_summary(conn, period, reference)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let ccy = AppConfig::load(conn)?.currency;
    println!("{} {} to {}", period, report.start, report.end);
    println!(
        "{}",
        pretty_table(
            &["Income", "Expenses", "Net savings", "Savings rate"],
            vec![vec![
                fmt_money(&report.totals.total_income, &ccy),
                fmt_money(&report.totals.total_expenses, &ccy),
                fmt_money(&report.totals.net_savings, &ccy),
                format!("{:.1}%", report.totals.savings_rate),
            ]],
        )
    );
    let rows = report
        .by_category
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                fmt_money(&c.amount, &ccy),
                format!("{}%", c.percentage),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
    Ok(())
}

fn chart(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let bucket: Period = req_arg(sub, "bucket")?.parse()?;
    let from = parse_date(&req_arg(sub, "from")?)?;
    let to = parse_date(&req_arg(sub, "to")?)?;
    if to < from {
        return Err(anyhow!("--to {} is before --from {}", to, from));
    }
    let expenses = SqliteStore::new(conn).load_expenses()?;
    let data = chart_series(&expenses, bucket, from, to);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let peak = data
            .points
            .iter()
            .map(|p| p.value)
            .max()
            .unwrap_or(Decimal::ZERO);
        let rows = data
            .points
            .iter()
            .map(|p| {
                let width = percent_of(p.value, peak)
                    .map(|pct| (pct / Decimal::from(5)).round())
                    .and_then(|w| w.to_usize())
                    .unwrap_or(0);
                vec![
                    p.key.clone(),
                    format!("{:.2}", p.value),
                    p.count.to_string(),
                    "#".repeat(width),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Bucket", "Spent", "Count", ""], rows));
        println!("Total {:.2} across {}", data.total, data.categories.join(", "));
    }
    Ok(())
}

fn calendar(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = parse_month(&req_arg(sub, "month")?)?;
    let cfg = AppConfig::load(conn)?;
    let expenses = SqliteStore::new(conn).load_expenses()?;
    let view = calendar_month(&expenses, year, month, cfg.daily_allowance())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        return Ok(());
    }
    let rows = view
        .days
        .iter()
        .map(|d| {
            let mark = if d.is_no_spend_day {
                "no spend"
            } else if d.has_overspending {
                "over"
            } else {
                ""
            };
            vec![
                d.date.format("%a %d").to_string(),
                format!("{:.2}", d.total),
                d.expenses.len().to_string(),
                mark.to_string(),
            ]
        })
        .collect();
    println!("{}-{:02}", view.year, view.month);
    println!("{}", pretty_table(&["Day", "Spent", "Count", ""], rows));
    let no_spend = view.days.iter().filter(|d| d.is_no_spend_day).count();
    let over = view.days.iter().filter(|d| d.has_overspending).count();
    println!("{} no-spend days, {} over the daily allowance", no_spend, over);
    Ok(())
}
