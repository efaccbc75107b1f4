// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Spendlens", "spendlens"));

pub const DB_ENV: &str = "SPENDLENS_DB";

/// Default on-disk location; `SPENDLENS_DB` (or `--db`) overrides it.
pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("spendlens.sqlite"))
}

pub fn db_path(overridden: Option<&str>) -> Result<PathBuf> {
    match overridden.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => Ok(PathBuf::from(p)),
        None => default_db_path(),
    }
}

pub fn open_or_init(overridden: Option<&str>) -> Result<Connection> {
    let path = db_path(overridden)?;
    open_at(&path)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Create directory {}", parent.display()))?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

/// Create every table the application needs. Idempotent.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS expenses(
        id TEXT PRIMARY KEY,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        note TEXT,
        payment_method TEXT,
        is_recurring INTEGER NOT NULL DEFAULT 0,
        recurring_id TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);

    CREATE TABLE IF NOT EXISTS incomes(
        id TEXT PRIMARY KEY,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        source TEXT NOT NULL,
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_incomes_date ON incomes(date);

    CREATE TABLE IF NOT EXISTS budget_limits(
        id TEXT PRIMARY KEY,
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        period TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1
    );

    CREATE TABLE IF NOT EXISTS recurring_expenses(
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        frequency TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT,
        next_due_date TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1,
        note TEXT,
        payment_method TEXT
    );

    CREATE TABLE IF NOT EXISTS savings_goals(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        target_amount TEXT NOT NULL,
        current_amount TEXT NOT NULL DEFAULT '0',
        target_date TEXT,
        created_at TEXT NOT NULL,
        is_completed INTEGER NOT NULL DEFAULT 0,
        completed_at TEXT
    );

    -- condition_key identifies the firing condition; resolved=0 rows suppress repeats
    CREATE TABLE IF NOT EXISTS alerts(
        id TEXT PRIMARY KEY,
        condition_key TEXT NOT NULL,
        type TEXT NOT NULL,
        title TEXT NOT NULL,
        message TEXT NOT NULL,
        category TEXT,
        amount TEXT NOT NULL,
        limit_amount TEXT NOT NULL,
        period TEXT NOT NULL,
        date TEXT NOT NULL,
        is_read INTEGER NOT NULL DEFAULT 0,
        severity TEXT NOT NULL,
        resolved INTEGER NOT NULL DEFAULT 0
    );
    CREATE INDEX IF NOT EXISTS idx_alerts_key ON alerts(condition_key, resolved);

    CREATE TABLE IF NOT EXISTS insights(
        id TEXT PRIMARY KEY,
        condition_key TEXT NOT NULL,
        type TEXT NOT NULL,
        title TEXT NOT NULL,
        message TEXT NOT NULL,
        category TEXT,
        percentage TEXT,
        date TEXT NOT NULL,
        is_read INTEGER NOT NULL DEFAULT 0,
        severity TEXT NOT NULL,
        resolved INTEGER NOT NULL DEFAULT 0
    );
    CREATE INDEX IF NOT EXISTS idx_insights_key ON insights(condition_key, resolved);

    CREATE TABLE IF NOT EXISTS achievements(
        id TEXT PRIMARY KEY,
        type TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        progress TEXT NOT NULL DEFAULT '0',
        max_progress TEXT NOT NULL,
        is_unlocked INTEGER NOT NULL DEFAULT 0,
        unlocked_at TEXT
    );

    CREATE TABLE IF NOT EXISTS streaks(
        id INTEGER PRIMARY KEY CHECK (id = 1),
        current_streak INTEGER NOT NULL DEFAULT 0,
        longest_streak INTEGER NOT NULL DEFAULT 0,
        last_spend_date TEXT,
        no_spend_days INTEGER NOT NULL DEFAULT 0,
        total_no_spend_days INTEGER NOT NULL DEFAULT 0,
        current_no_spend_streak INTEGER NOT NULL DEFAULT 0,
        longest_no_spend_streak INTEGER NOT NULL DEFAULT 0
    );
    "#,
    )?;
    Ok(())
}
