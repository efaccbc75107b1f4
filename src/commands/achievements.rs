// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::engine::gamification::{AchievementInput, check_achievements};
use crate::models::Achievement;
use crate::store::{LedgerStore, SqliteStore};
use crate::utils::{date_arg_or_today, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("check", sub)) => check(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Refresh achievement progress as of `reference`. Returns the full set and
/// the ids unlocked by this pass.
pub fn run_check(conn: &Connection, reference: NaiveDate) -> Result<(Vec<Achievement>, Vec<String>)> {
    let cfg = AppConfig::load(conn)?;
    let store = SqliteStore::new(conn);
    store.seed_achievements()?;
    let current = store.load_achievements()?;
    let expenses = store.load_expenses()?;
    let goals = store.load_savings_goals()?;

    let mut input = AchievementInput::new(&expenses, &goals, reference)
        .with_monthly_budget(cfg.monthly_budget);
    input.horizon_days = cfg.streak_horizon_days;
    let updated = check_achievements(&input, &current);

    let unlocked: Vec<String> = updated
        .iter()
        .filter(|a| {
            a.is_unlocked
                && current
                    .iter()
                    .any(|c| c.id == a.id && !c.is_unlocked)
        })
        .map(|a| a.id.clone())
        .collect();
    store.persist_achievements(&updated)?;
    for id in &unlocked {
        tracing::info!(%id, "achievement unlocked");
    }
    Ok((updated, unlocked))
}

fn rows(achievements: &[Achievement]) -> Vec<Vec<String>> {
    achievements
        .iter()
        .map(|a| {
            vec![
                a.title.clone(),
                a.description.clone(),
                format!("{} / {}", a.progress.normalize(), a.max_progress.normalize()),
                a.unlocked_at
                    .map(|d| format!("unlocked {}", d))
                    .unwrap_or_else(|| "locked".into()),
            ]
        })
        .collect()
}

const HEADERS: [&str; 4] = ["Achievement", "Description", "Progress", "Status"];

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    store.seed_achievements()?;
    let data = store.load_achievements()?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&HEADERS, rows(&data)));
    }
    Ok(())
}

fn check(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    if !AppConfig::load(conn)?.gamification_enabled {
        println!("Gamification is turned off (config set gamification_enabled true)");
        return Ok(());
    }
    let reference = date_arg_or_today(sub, "as-of")?;
    let (all, unlocked) = run_check(conn, reference)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &all)? {
        return Ok(());
    }
    println!("{}", pretty_table(&HEADERS, rows(&all)));
    for a in all.iter().filter(|a| unlocked.contains(&a.id)) {
        println!("Unlocked: {}", a.title);
    }
    Ok(())
}
