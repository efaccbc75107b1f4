// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::models::{Expense, PaymentMethod};
use crate::store::SqliteStore;
use crate::utils::{
    date_arg_or_today, fmt_money, maybe_print_json, new_id, opt_arg, parse_amount, parse_date,
    pretty_table, req_arg,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_amount(&req_arg(sub, "amount")?)?;
    let category = req_arg(sub, "category")?;
    let date = date_arg_or_today(sub, "date")?;
    let mut expense = Expense::new(new_id(), amount, category, date);
    expense.note = opt_arg(sub, "note");
    expense.payment_method = opt_arg(sub, "payment")
        .map(|p| p.parse::<PaymentMethod>().map_err(|e| anyhow!(e)))
        .transpose()?;

    SqliteStore::new(conn).add_expense(&expense)?;
    tracing::info!(id = %expense.id, %amount, "expense recorded");
    let cfg = AppConfig::load(conn)?;
    println!(
        "Recorded {} on {} for '{}' (id: {})",
        fmt_money(&amount, &cfg.currency),
        date,
        expense.category,
        expense.id
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    if !SqliteStore::new(conn).delete_expense(&id)? {
        return Err(anyhow!("Expense '{}' not found", id));
    }
    println!("Deleted expense {}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.date.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.payment_method.clone(),
                    r.note.clone(),
                    if r.is_recurring { "yes".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Category", "Amount", "Payment", "Note", "Recurring"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct ExpenseRow {
    pub id: String,
    pub date: String,
    pub category: String,
    pub amount: String,
    pub payment_method: String,
    pub note: String,
    pub is_recurring: bool,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<ExpenseRow>> {
    let mut sql = String::from(
        "SELECT id, date, category, amount, payment_method, note, is_recurring FROM expenses WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(from) = opt_arg(sub, "from") {
        sql.push_str(" AND date>=?");
        params_vec.push(parse_date(&from)?.to_string());
    }
    if let Some(to) = opt_arg(sub, "to") {
        sql.push_str(" AND date<=?");
        params_vec.push(parse_date(&to)?.to_string());
    }
    if let Some(cat) = opt_arg(sub, "category") {
        sql.push_str(" AND category=?");
        params_vec.push(cat);
    }
    sql.push_str(" ORDER BY date DESC, rowid DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let payment: Option<String> = r.get(4)?;
        let note: Option<String> = r.get(5)?;
        data.push(ExpenseRow {
            id: r.get(0)?,
            date: r.get(1)?,
            category: r.get(2)?,
            amount: r.get(3)?,
            payment_method: payment.unwrap_or_default(),
            note: note.unwrap_or_default(),
            is_recurring: r.get(6)?,
        });
    }
    Ok(data)
}
