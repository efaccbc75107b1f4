// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Host settings persisted in the `settings` key/value table.

use crate::engine::gamification::DEFAULT_HORIZON_DAYS;
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub const KEY_MONTHLY_BUDGET: &str = "monthly_budget";
pub const KEY_CURRENCY: &str = "currency";
pub const KEY_OVERSPENDING_ALERTS: &str = "overspending_alerts";
pub const KEY_BUDGET_LIMIT_ALERTS: &str = "budget_limit_alerts";
pub const KEY_SAVINGS_GOAL_ALERTS: &str = "savings_goal_alerts";
pub const KEY_WEEKLY_INSIGHTS: &str = "weekly_insights";
pub const KEY_GAMIFICATION: &str = "gamification_enabled";
pub const KEY_STREAK_HORIZON: &str = "streak_horizon_days";

pub const KNOWN_KEYS: [&str; 8] = [
    KEY_MONTHLY_BUDGET,
    KEY_CURRENCY,
    KEY_OVERSPENDING_ALERTS,
    KEY_BUDGET_LIMIT_ALERTS,
    KEY_SAVINGS_GOAL_ALERTS,
    KEY_WEEKLY_INSIGHTS,
    KEY_GAMIFICATION,
    KEY_STREAK_HORIZON,
];

/// Which alert and insight passes the host runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlertSettings {
    pub overspending_alerts: bool,
    pub budget_limit_alerts: bool,
    pub savings_goal_alerts: bool,
    pub weekly_insights: bool,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            overspending_alerts: true,
            budget_limit_alerts: true,
            savings_goal_alerts: true,
            weekly_insights: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub monthly_budget: Option<Decimal>,
    pub currency: String,
    pub alerts: AlertSettings,
    pub gamification_enabled: bool,
    pub streak_horizon_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            monthly_budget: None,
            currency: "₹".to_string(),
            alerts: AlertSettings::default(),
            gamification_enabled: true,
            streak_horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

impl AppConfig {
    /// Read every known key, falling back to defaults for missing ones.
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut cfg = AppConfig::default();
        if let Some(v) = get_setting(conn, KEY_MONTHLY_BUDGET)? {
            cfg.monthly_budget = Some(parse_budget(&v)?);
        }
        if let Some(v) = get_setting(conn, KEY_CURRENCY)? {
            cfg.currency = v;
        }
        cfg.alerts.overspending_alerts =
            get_bool(conn, KEY_OVERSPENDING_ALERTS, cfg.alerts.overspending_alerts)?;
        cfg.alerts.budget_limit_alerts =
            get_bool(conn, KEY_BUDGET_LIMIT_ALERTS, cfg.alerts.budget_limit_alerts)?;
        cfg.alerts.savings_goal_alerts =
            get_bool(conn, KEY_SAVINGS_GOAL_ALERTS, cfg.alerts.savings_goal_alerts)?;
        cfg.alerts.weekly_insights = get_bool(conn, KEY_WEEKLY_INSIGHTS, cfg.alerts.weekly_insights)?;
        cfg.gamification_enabled = get_bool(conn, KEY_GAMIFICATION, cfg.gamification_enabled)?;
        if let Some(v) = get_setting(conn, KEY_STREAK_HORIZON)? {
            cfg.streak_horizon_days = parse_horizon(&v)?;
        }
        Ok(cfg)
    }

    /// Validate and persist one setting.
    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let normalized = match key {
            KEY_MONTHLY_BUDGET => {
                if value.is_empty() || value.eq_ignore_ascii_case("none") {
                    conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
                    tracing::info!(key, "setting cleared");
                    return Ok(());
                }
                parse_budget(value)?.to_string()
            }
            KEY_CURRENCY => {
                if value.is_empty() {
                    return Err(anyhow!("Currency symbol cannot be empty"));
                }
                value.to_string()
            }
            KEY_OVERSPENDING_ALERTS | KEY_BUDGET_LIMIT_ALERTS | KEY_SAVINGS_GOAL_ALERTS
            | KEY_WEEKLY_INSIGHTS | KEY_GAMIFICATION => parse_bool(value)?.to_string(),
            KEY_STREAK_HORIZON => parse_horizon(value)?.to_string(),
            other => {
                return Err(anyhow!(
                    "Unknown setting '{}', expected one of: {}",
                    other,
                    KNOWN_KEYS.join(", ")
                ));
            }
        };
        set_setting(conn, key, &normalized)?;
        tracing::info!(key, value = %normalized, "setting updated");
        Ok(())
    }

    /// Key/value pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                KEY_MONTHLY_BUDGET,
                self.monthly_budget
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            (KEY_CURRENCY, self.currency.clone()),
            (KEY_OVERSPENDING_ALERTS, self.alerts.overspending_alerts.to_string()),
            (KEY_BUDGET_LIMIT_ALERTS, self.alerts.budget_limit_alerts.to_string()),
            (KEY_SAVINGS_GOAL_ALERTS, self.alerts.savings_goal_alerts.to_string()),
            (KEY_WEEKLY_INSIGHTS, self.alerts.weekly_insights.to_string()),
            (KEY_GAMIFICATION, self.gamification_enabled.to_string()),
            (KEY_STREAK_HORIZON, self.streak_horizon_days.to_string()),
        ]
    }

    /// Daily allowance derived from the monthly budget.
    pub fn daily_allowance(&self) -> Option<Decimal> {
        self.monthly_budget
            .filter(|b| *b > Decimal::ZERO)
            .map(|b| b / Decimal::from(30))
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

fn get_bool(conn: &Connection, key: &str, default: bool) -> Result<bool> {
    match get_setting(conn, key)? {
        Some(v) => parse_bool(&v).with_context(|| format!("Setting '{}'", key)),
        None => Ok(default),
    }
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(anyhow!("Invalid boolean '{}', expected true|false", other)),
    }
}

fn parse_budget(s: &str) -> Result<Decimal> {
    let d = crate::utils::parse_decimal(s)?;
    if d < Decimal::ZERO {
        return Err(anyhow!("Monthly budget cannot be negative, got {}", d));
    }
    Ok(d)
}

fn parse_horizon(s: &str) -> Result<u32> {
    let n: u32 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid horizon '{}', expected a number of days", s))?;
    if n == 0 {
        return Err(anyhow!("Streak horizon must be at least one day"));
    }
    Ok(n)
}
