// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::engine::gamification::compute_streaks;
use crate::models::StreakData;
use crate::store::{LedgerStore, SqliteStore};
use crate::utils::{date_arg_or_today, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("show", sub)) = m.subcommand() {
        show(conn, sub)?;
    }
    Ok(())
}

/// Recompute streaks as of `reference` and store the snapshot.
pub fn refresh(conn: &Connection, reference: NaiveDate) -> Result<StreakData> {
    let cfg = AppConfig::load(conn)?;
    let store = SqliteStore::new(conn);
    let data = compute_streaks(&store.load_expenses()?, reference, cfg.streak_horizon_days);
    store.persist_streak_data(&data)?;
    tracing::debug!(current = data.current_streak, longest = data.longest_streak, "streaks refreshed");
    Ok(data)
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    if !AppConfig::load(conn)?.gamification_enabled {
        println!("Gamification is turned off (config set gamification_enabled true)");
        return Ok(());
    }
    let reference = date_arg_or_today(sub, "as-of")?;
    let data = refresh(conn, reference)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = vec![
            vec![
                "Tracking".to_string(),
                data.current_streak.to_string(),
                data.longest_streak.to_string(),
            ],
            vec![
                "No spend".to_string(),
                data.current_no_spend_streak.to_string(),
                data.longest_no_spend_streak.to_string(),
            ],
        ];
        println!("{}", pretty_table(&["Streak", "Current", "Longest"], rows));
        println!(
            "Last spend: {}; {} no-spend days in the window",
            data.last_spend_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "never".into()),
            data.total_no_spend_days
        );
    }
    Ok(())
}
