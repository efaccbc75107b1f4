// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::models::Income;
use crate::store::{LedgerStore, SqliteStore};
use crate::utils::{
    date_arg_or_today, fmt_money, maybe_print_json, new_id, opt_arg, parse_amount, parse_date,
    pretty_table, req_arg,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

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
    let source = req_arg(sub, "source")?;
    let date = date_arg_or_today(sub, "date")?;
    let mut income = Income::new(new_id(), amount, source, date);
    income.note = opt_arg(sub, "note");
    SqliteStore::new(conn).add_income(&income)?;
    tracing::info!(id = %income.id, %amount, "income recorded");
    let cfg = AppConfig::load(conn)?;
    println!(
        "Recorded income {} on {} from '{}' (id: {})",
        fmt_money(&amount, &cfg.currency),
        date,
        income.source,
        income.id
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    if !SqliteStore::new(conn).delete_income(&id)? {
        return Err(anyhow!("Income '{}' not found", id));
    }
    println!("Deleted income {}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let from = opt_arg(sub, "from").map(|s| parse_date(&s)).transpose()?;
    let to = opt_arg(sub, "to").map(|s| parse_date(&s)).transpose()?;
    let mut data: Vec<Income> = SqliteStore::new(conn)
        .load_incomes()?
        .into_iter()
        .filter(|i| from.is_none_or(|f| i.date >= f) && to.is_none_or(|t| i.date <= t))
        .collect();
    data.reverse();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|i| {
                vec![
                    i.id.clone(),
                    i.date.to_string(),
                    i.source.clone(),
                    format!("{:.2}", i.amount),
                    i.note.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Id", "Date", "Source", "Amount", "Note"], rows));
    }
    Ok(())
}
