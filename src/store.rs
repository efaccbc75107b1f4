// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Storage port for the analytics core and its SQLite adapter.
//!
//! The core only ever sees loaded snapshots; everything that reads or writes
//! the database goes through [`LedgerStore`] or the CRUD helpers on
//! [`SqliteStore`]. Rows that cannot be decoded are logged and skipped so one
//! bad record never hides the rest of the ledger.

use crate::engine::gamification::default_achievements;
use crate::models::{
    Achievement, AchievementKind, AlertType, BudgetLimit, Category, Expense, Frequency, Income,
    InsightType, PaymentMethod, Period, RecurringExpense, SavingsGoal, Severity, SpendingAlert,
    SpendingInsight, StreakData, condition_key_prefix,
};
use crate::utils::{new_id, parse_date, parse_decimal};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::collections::HashSet;

pub trait LedgerStore {
    fn load_expenses(&self) -> Result<Vec<Expense>>;
    fn load_incomes(&self) -> Result<Vec<Income>>;
    fn load_categories(&self) -> Result<Vec<Category>>;
    fn load_budget_limits(&self) -> Result<Vec<BudgetLimit>>;
    fn load_recurring_definitions(&self) -> Result<Vec<RecurringExpense>>;
    fn load_savings_goals(&self) -> Result<Vec<SavingsGoal>>;
    fn load_achievements(&self) -> Result<Vec<Achievement>>;
    fn load_streak_data(&self) -> Result<StreakData>;

    fn load_ledger(&self) -> Result<(Vec<Expense>, Vec<Income>)> {
        Ok((self.load_expenses()?, self.load_incomes()?))
    }

    /// Condition keys of alerts already raised and not yet resolved.
    fn active_alert_keys(&self) -> Result<HashSet<String>>;
    /// Condition keys of unresolved insights generated for `period`.
    fn active_insight_keys(&self, period: Period) -> Result<HashSet<String>>;

    fn persist_generated_expense(&self, expense: &Expense) -> Result<()>;
    /// Write back the schedule fields of an advanced definition.
    fn persist_advanced_definition(&self, def: &RecurringExpense) -> Result<()>;
    /// Store each generated instance together with its advanced definition,
    /// all or nothing.
    fn persist_recurring_run(&self, generated: &[(Expense, RecurringExpense)]) -> Result<()>;
    fn persist_alerts(&self, alerts: &[SpendingAlert]) -> Result<()>;
    /// Mark unresolved alerts whose condition is no longer in `firing`.
    fn resolve_cleared_alerts(&self, firing: &HashSet<String>) -> Result<usize>;
    fn persist_insights(&self, insights: &[SpendingInsight], period: Period) -> Result<()>;
    fn resolve_cleared_insights(&self, firing: &HashSet<String>, period: Period) -> Result<usize>;
    fn persist_achievements(&self, achievements: &[Achievement]) -> Result<()>;
    fn persist_streak_data(&self, data: &StreakData) -> Result<()>;
}

pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn load_rows<T>(
        &self,
        sql: &str,
        table: &str,
        decode: fn(&Row<'_>) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |r| Ok(decode(r)))?;
        let mut out = Vec::new();
        for row in rows {
            match row? {
                Ok(v) => out.push(v),
                Err(err) => tracing::warn!(table, error = %format!("{:#}", err), "skipping unreadable row"),
            }
        }
        Ok(out)
    }

    /// Look up or create a category by name.
    pub fn ensure_category(&self, name: &str) -> Result<i64> {
        if let Some(id) = self
            .conn
            .query_row(
                "SELECT id FROM categories WHERE name=?1",
                params![name],
                |r| r.get::<_, i64>(0),
            )
            .optional()?
        {
            return Ok(id);
        }
        self.conn
            .execute("INSERT INTO categories(name) VALUES (?1)", params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn add_expense(&self, e: &Expense) -> Result<()> {
        self.ensure_category(&e.category)?;
        insert_expense(self.conn, e)
    }

    pub fn delete_expense(&self, id: &str) -> Result<bool> {
        let n = self.conn.execute("DELETE FROM expenses WHERE id=?1", params![id])?;
        Ok(n > 0)
    }

    pub fn add_income(&self, i: &Income) -> Result<()> {
        self.conn.execute(
            "INSERT INTO incomes(id, date, amount, source, note) VALUES (?1,?2,?3,?4,?5)",
            params![i.id, i.date.to_string(), i.amount.to_string(), i.source, i.note],
        )?;
        Ok(())
    }

    pub fn delete_income(&self, id: &str) -> Result<bool> {
        let n = self.conn.execute("DELETE FROM incomes WHERE id=?1", params![id])?;
        Ok(n > 0)
    }

    /// One active limit per (category, period): an existing one is updated.
    pub fn upsert_limit(&self, category: &str, amount: Decimal, period: Period) -> Result<String> {
        self.ensure_category(category)?;
        let existing: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM budget_limits WHERE category=?1 AND period=?2 AND is_active=1
                 ORDER BY id LIMIT 1",
                params![category, period.as_str()],
                |r| r.get(0),
            )
            .optional()?;
        match existing {
            Some(id) => {
                self.conn.execute(
                    "UPDATE budget_limits SET amount=?1 WHERE id=?2",
                    params![amount.to_string(), id],
                )?;
                Ok(id)
            }
            None => {
                let id = new_id();
                self.conn.execute(
                    "INSERT INTO budget_limits(id, category, amount, period, is_active)
                     VALUES (?1,?2,?3,?4,1)",
                    params![id, category, amount.to_string(), period.as_str()],
                )?;
                Ok(id)
            }
        }
    }

    pub fn delete_limit(&self, id: &str) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM budget_limits WHERE id=?1", params![id])?;
        Ok(n > 0)
    }

    pub fn add_recurring(&self, def: &RecurringExpense) -> Result<()> {
        self.ensure_category(&def.category)?;
        self.conn.execute(
            "INSERT INTO recurring_expenses(id, title, amount, category, frequency, start_date,
                end_date, next_due_date, is_active, note, payment_method)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
            params![
                def.id,
                def.title,
                def.amount.to_string(),
                def.category,
                def.frequency.as_str(),
                def.start_date.to_string(),
                def.end_date.map(|d| d.to_string()),
                def.next_due_date.to_string(),
                def.is_active,
                def.note,
                def.payment_method.map(|p| p.as_str()),
            ],
        )?;
        Ok(())
    }

    pub fn set_recurring_active(&self, id: &str, active: bool) -> Result<bool> {
        let n = self.conn.execute(
            "UPDATE recurring_expenses SET is_active=?1 WHERE id=?2",
            params![active, id],
        )?;
        Ok(n > 0)
    }

    pub fn add_goal(&self, goal: &SavingsGoal) -> Result<()> {
        self.conn.execute(
            "INSERT INTO savings_goals(id, name, target_amount, current_amount, target_date,
                created_at, is_completed, completed_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![
                goal.id,
                goal.name,
                goal.target_amount.to_string(),
                goal.current_amount.to_string(),
                goal.target_date.map(|d| d.to_string()),
                goal.created_at.to_string(),
                goal.is_completed,
                goal.completed_at.map(|d| d.to_string()),
            ],
        )?;
        Ok(())
    }

    /// Add to a goal's saved amount, completing it once the target is met.
    pub fn contribute_goal(&self, id: &str, amount: Decimal, today: NaiveDate) -> Result<SavingsGoal> {
        let mut goal = self
            .load_savings_goals()?
            .into_iter()
            .find(|g| g.id == id)
            .ok_or_else(|| anyhow!("Savings goal '{}' not found", id))?;
        goal.current_amount += amount;
        if !goal.is_completed && goal.current_amount >= goal.target_amount {
            goal.is_completed = true;
            goal.completed_at = Some(today);
        }
        self.conn.execute(
            "UPDATE savings_goals SET current_amount=?1, is_completed=?2, completed_at=?3 WHERE id=?4",
            params![
                goal.current_amount.to_string(),
                goal.is_completed,
                goal.completed_at.map(|d| d.to_string()),
                goal.id,
            ],
        )?;
        Ok(goal)
    }

    pub fn load_alerts(&self, unread_only: bool) -> Result<Vec<SpendingAlert>> {
        let sql = if unread_only {
            "SELECT id, type, title, message, category, amount, limit_amount, period, date, is_read, severity
             FROM alerts WHERE is_read=0 ORDER BY date DESC, rowid DESC"
        } else {
            "SELECT id, type, title, message, category, amount, limit_amount, period, date, is_read, severity
             FROM alerts ORDER BY date DESC, rowid DESC"
        };
        self.load_rows(sql, "alerts", decode_alert)
    }

    /// Mark one alert read, or all of them when `id` is `None`.
    pub fn mark_alerts_read(&self, id: Option<&str>) -> Result<usize> {
        let n = match id {
            Some(id) => self
                .conn
                .execute("UPDATE alerts SET is_read=1 WHERE id=?1", params![id])?,
            None => self
                .conn
                .execute("UPDATE alerts SET is_read=1 WHERE is_read=0", [])?,
        };
        Ok(n)
    }

    pub fn load_insights(&self, unread_only: bool) -> Result<Vec<SpendingInsight>> {
        let sql = if unread_only {
            "SELECT id, type, title, message, category, percentage, date, is_read, severity,
                condition_key
             FROM insights WHERE is_read=0 ORDER BY date DESC, rowid DESC"
        } else {
            "SELECT id, type, title, message, category, percentage, date, is_read, severity,
                condition_key
             FROM insights ORDER BY date DESC, rowid DESC"
        };
        self.load_rows(sql, "insights", decode_insight)
    }

    /// Insert the default achievement catalogue when none exist yet.
    pub fn seed_achievements(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM achievements", [], |r| r.get(0))?;
        if count > 0 {
            return Ok(0);
        }
        let defaults = default_achievements();
        self.persist_achievements(&defaults)?;
        tracing::info!(count = defaults.len(), "seeded default achievements");
        Ok(defaults.len())
    }
}

impl LedgerStore for SqliteStore<'_> {
    fn load_expenses(&self) -> Result<Vec<Expense>> {
        self.load_rows(
            "SELECT id, date, amount, category, note, payment_method, is_recurring, recurring_id
             FROM expenses ORDER BY date, rowid",
            "expenses",
            decode_expense,
        )
    }

    fn load_incomes(&self) -> Result<Vec<Income>> {
        self.load_rows(
            "SELECT id, date, amount, source, note FROM incomes ORDER BY date, rowid",
            "incomes",
            |r| {
                let id: String = r.get(0)?;
                Ok(Income {
                    date: parse_date(&r.get::<_, String>(1)?)
                        .with_context(|| format!("income {}", id))?,
                    amount: parse_decimal(&r.get::<_, String>(2)?)
                        .with_context(|| format!("income {}", id))?,
                    source: r.get(3)?,
                    note: r.get(4)?,
                    id,
                })
            },
        )
    }

    fn load_categories(&self) -> Result<Vec<Category>> {
        self.load_rows(
            "SELECT id, name FROM categories ORDER BY name",
            "categories",
            |r| {
                Ok(Category {
                    id: r.get::<_, i64>(0)?.to_string(),
                    name: r.get(1)?,
                })
            },
        )
    }

    fn load_budget_limits(&self) -> Result<Vec<BudgetLimit>> {
        self.load_rows(
            "SELECT id, category, amount, period, is_active FROM budget_limits ORDER BY category, period",
            "budget_limits",
            |r| {
                let id: String = r.get(0)?;
                Ok(BudgetLimit {
                    category: r.get(1)?,
                    amount: parse_decimal(&r.get::<_, String>(2)?)
                        .with_context(|| format!("limit {}", id))?,
                    period: r.get::<_, String>(3)?.parse::<Period>()?,
                    is_active: r.get(4)?,
                    id,
                })
            },
        )
    }

    fn load_recurring_definitions(&self) -> Result<Vec<RecurringExpense>> {
        self.load_rows(
            "SELECT id, title, amount, category, frequency, start_date, end_date, next_due_date,
                    is_active, note, payment_method
             FROM recurring_expenses ORDER BY next_due_date, id",
            "recurring_expenses",
            decode_recurring,
        )
    }

    fn load_savings_goals(&self) -> Result<Vec<SavingsGoal>> {
        self.load_rows(
            "SELECT id, name, target_amount, current_amount, target_date, created_at,
                    is_completed, completed_at
             FROM savings_goals ORDER BY created_at, id",
            "savings_goals",
            |r| {
                let id: String = r.get(0)?;
                Ok(SavingsGoal {
                    name: r.get(1)?,
                    target_amount: parse_decimal(&r.get::<_, String>(2)?)?,
                    current_amount: parse_decimal(&r.get::<_, String>(3)?)?,
                    target_date: opt_date(r.get(4)?)?,
                    created_at: parse_date(&r.get::<_, String>(5)?)?,
                    is_completed: r.get(6)?,
                    completed_at: opt_date(r.get(7)?)?,
                    id,
                })
            },
        )
    }

    fn load_achievements(&self) -> Result<Vec<Achievement>> {
        self.load_rows(
            "SELECT id, type, title, description, progress, max_progress, is_unlocked, unlocked_at
             FROM achievements ORDER BY rowid",
            "achievements",
            |r| {
                Ok(Achievement {
                    id: r.get(0)?,
                    kind: r
                        .get::<_, String>(1)?
                        .parse::<AchievementKind>()
                        .map_err(anyhow::Error::msg)?,
                    title: r.get(2)?,
                    description: r.get(3)?,
                    progress: parse_decimal(&r.get::<_, String>(4)?)?,
                    max_progress: parse_decimal(&r.get::<_, String>(5)?)?,
                    is_unlocked: r.get(6)?,
                    unlocked_at: opt_date(r.get(7)?)?,
                })
            },
        )
    }

    fn load_streak_data(&self) -> Result<StreakData> {
        let row = self
            .conn
            .query_row(
                "SELECT current_streak, longest_streak, last_spend_date, no_spend_days,
                        total_no_spend_days, current_no_spend_streak, longest_no_spend_streak
                 FROM streaks WHERE id=1",
                [],
                |r| {
                    Ok((
                        r.get::<_, u32>(0)?,
                        r.get::<_, u32>(1)?,
                        r.get::<_, Option<String>>(2)?,
                        r.get::<_, u32>(3)?,
                        r.get::<_, u32>(4)?,
                        r.get::<_, u32>(5)?,
                        r.get::<_, u32>(6)?,
                    ))
                },
            )
            .optional()?;
        let Some((cur, longest, last, ns, total_ns, cur_ns, longest_ns)) = row else {
            return Ok(StreakData::default());
        };
        Ok(StreakData {
            current_streak: cur,
            longest_streak: longest,
            last_spend_date: opt_date(last)?,
            no_spend_days: ns,
            total_no_spend_days: total_ns,
            current_no_spend_streak: cur_ns,
            longest_no_spend_streak: longest_ns,
        })
    }

    fn active_alert_keys(&self) -> Result<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT condition_key FROM alerts WHERE resolved=0")?;
        let keys = stmt
            .query_map([], |r| r.get::<_, String>(0))?
            .collect::<rusqlite::Result<HashSet<_>>>()?;
        Ok(keys)
    }

    fn active_insight_keys(&self, period: Period) -> Result<HashSet<String>> {
        let prefix = condition_key_prefix(period);
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT condition_key FROM insights WHERE resolved=0")?;
        let keys = stmt
            .query_map([], |r| r.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keys.into_iter().filter(|k| k.starts_with(&prefix)).collect())
    }

    fn persist_generated_expense(&self, expense: &Expense) -> Result<()> {
        self.add_expense(expense)
    }

    fn persist_advanced_definition(&self, def: &RecurringExpense) -> Result<()> {
        let n = self.conn.execute(
            "UPDATE recurring_expenses SET next_due_date=?1, is_active=?2 WHERE id=?3",
            params![def.next_due_date.to_string(), def.is_active, def.id],
        )?;
        if n == 0 {
            return Err(anyhow!("Recurring definition '{}' not found", def.id));
        }
        Ok(())
    }

    fn persist_recurring_run(&self, generated: &[(Expense, RecurringExpense)]) -> Result<()> {
        // Statements on the same connection run inside the open transaction.
        let tx = self.conn.unchecked_transaction()?;
        for (instance, def) in generated {
            self.persist_generated_expense(instance)
                .with_context(|| format!("Insert instance of recurring '{}'", def.id))?;
            self.persist_advanced_definition(def)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn persist_alerts(&self, alerts: &[SpendingAlert]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for a in alerts {
            tx.execute(
                "INSERT INTO alerts(id, condition_key, type, title, message, category, amount,
                    limit_amount, period, date, is_read, severity, resolved)
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,0)",
                params![
                    a.id,
                    a.condition_key(),
                    a.alert_type.as_str(),
                    a.title,
                    a.message,
                    a.category,
                    a.amount.to_string(),
                    a.limit.to_string(),
                    a.period.as_str(),
                    a.date.to_string(),
                    a.is_read,
                    a.severity.as_str(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn resolve_cleared_alerts(&self, firing: &HashSet<String>) -> Result<usize> {
        let cleared: Vec<String> = self
            .active_alert_keys()?
            .into_iter()
            .filter(|k| !firing.contains(k))
            .collect();
        let mut n = 0;
        for key in &cleared {
            n += self.conn.execute(
                "UPDATE alerts SET resolved=1 WHERE condition_key=?1 AND resolved=0",
                params![key],
            )?;
        }
        Ok(n)
    }

    fn persist_insights(&self, insights: &[SpendingInsight], period: Period) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for i in insights {
            tx.execute(
                "INSERT INTO insights(id, condition_key, type, title, message, category,
                    percentage, date, is_read, severity, resolved)
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,0)",
                params![
                    i.id,
                    i.condition_key(period),
                    i.insight_type.as_str(),
                    i.title,
                    i.message,
                    i.category,
                    i.percentage.map(|p| p.to_string()),
                    i.date.to_string(),
                    i.is_read,
                    i.severity.as_str(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn resolve_cleared_insights(&self, firing: &HashSet<String>, period: Period) -> Result<usize> {
        let cleared: Vec<String> = self
            .active_insight_keys(period)?
            .into_iter()
            .filter(|k| !firing.contains(k))
            .collect();
        let mut n = 0;
        for key in &cleared {
            n += self.conn.execute(
                "UPDATE insights SET resolved=1 WHERE condition_key=?1 AND resolved=0",
                params![key],
            )?;
        }
        Ok(n)
    }

    fn persist_achievements(&self, achievements: &[Achievement]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for a in achievements {
            tx.execute(
                "INSERT INTO achievements(id, type, title, description, progress, max_progress,
                    is_unlocked, unlocked_at)
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8)
                 ON CONFLICT(id) DO UPDATE SET
                    progress=excluded.progress,
                    max_progress=excluded.max_progress,
                    is_unlocked=excluded.is_unlocked,
                    unlocked_at=excluded.unlocked_at",
                params![
                    a.id,
                    a.kind.as_str(),
                    a.title,
                    a.description,
                    a.progress.to_string(),
                    a.max_progress.to_string(),
                    a.is_unlocked,
                    a.unlocked_at.map(|d| d.to_string()),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn persist_streak_data(&self, data: &StreakData) -> Result<()> {
        self.conn.execute(
            "INSERT INTO streaks(id, current_streak, longest_streak, last_spend_date, no_spend_days,
                total_no_spend_days, current_no_spend_streak, longest_no_spend_streak)
             VALUES (1,?1,?2,?3,?4,?5,?6,?7)
             ON CONFLICT(id) DO UPDATE SET
                current_streak=excluded.current_streak,
                longest_streak=excluded.longest_streak,
                last_spend_date=excluded.last_spend_date,
                no_spend_days=excluded.no_spend_days,
                total_no_spend_days=excluded.total_no_spend_days,
                current_no_spend_streak=excluded.current_no_spend_streak,
                longest_no_spend_streak=excluded.longest_no_spend_streak",
            params![
                data.current_streak,
                data.longest_streak,
                data.last_spend_date.map(|d| d.to_string()),
                data.no_spend_days,
                data.total_no_spend_days,
                data.current_no_spend_streak,
                data.longest_no_spend_streak,
            ],
        )?;
        Ok(())
    }
}

fn insert_expense(conn: &Connection, e: &Expense) -> Result<()> {
    conn.execute(
        "INSERT INTO expenses(id, date, amount, category, note, payment_method, is_recurring, recurring_id)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
        params![
            e.id,
            e.date.to_string(),
            e.amount.to_string(),
            e.category,
            e.note,
            e.payment_method.map(|p| p.as_str()),
            e.is_recurring,
            e.recurring_id,
        ],
    )?;
    Ok(())
}

fn opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
    s.filter(|s| !s.trim().is_empty())
        .map(|s| parse_date(&s))
        .transpose()
}

fn opt_payment(s: Option<String>) -> Result<Option<PaymentMethod>> {
    s.filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<PaymentMethod>().map_err(anyhow::Error::msg))
        .transpose()
}

fn decode_expense(r: &Row<'_>) -> Result<Expense> {
    let id: String = r.get(0)?;
    let ctx = || format!("expense {}", id);
    Ok(Expense {
        date: parse_date(&r.get::<_, String>(1)?).with_context(ctx)?,
        amount: parse_decimal(&r.get::<_, String>(2)?).with_context(ctx)?,
        category: r.get(3)?,
        note: r.get(4)?,
        payment_method: opt_payment(r.get(5)?).with_context(ctx)?,
        is_recurring: r.get(6)?,
        recurring_id: r.get(7)?,
        id: id.clone(),
    })
}

fn decode_recurring(r: &Row<'_>) -> Result<RecurringExpense> {
    let id: String = r.get(0)?;
    let ctx = || format!("recurring {}", id);
    Ok(RecurringExpense {
        title: r.get(1)?,
        amount: parse_decimal(&r.get::<_, String>(2)?).with_context(ctx)?,
        category: r.get(3)?,
        frequency: r
            .get::<_, String>(4)?
            .parse::<Frequency>()
            .with_context(ctx)?,
        start_date: parse_date(&r.get::<_, String>(5)?).with_context(ctx)?,
        end_date: opt_date(r.get(6)?).with_context(ctx)?,
        next_due_date: parse_date(&r.get::<_, String>(7)?).with_context(ctx)?,
        is_active: r.get(8)?,
        note: r.get(9)?,
        payment_method: opt_payment(r.get(10)?).with_context(ctx)?,
        id: id.clone(),
    })
}

fn decode_alert(r: &Row<'_>) -> Result<SpendingAlert> {
    Ok(SpendingAlert {
        id: r.get(0)?,
        alert_type: r
            .get::<_, String>(1)?
            .parse::<AlertType>()
            .map_err(anyhow::Error::msg)?,
        title: r.get(2)?,
        message: r.get(3)?,
        category: r.get(4)?,
        amount: parse_decimal(&r.get::<_, String>(5)?)?,
        limit: parse_decimal(&r.get::<_, String>(6)?)?,
        period: r.get::<_, String>(7)?.parse::<Period>()?,
        date: parse_date(&r.get::<_, String>(8)?)?,
        is_read: r.get(9)?,
        severity: r
            .get::<_, String>(10)?
            .parse::<Severity>()
            .map_err(anyhow::Error::msg)?,
    })
}

fn decode_insight(r: &Row<'_>) -> Result<SpendingInsight> {
    Ok(SpendingInsight {
        id: r.get(0)?,
        insight_type: r
            .get::<_, String>(1)?
            .parse::<InsightType>()
            .map_err(anyhow::Error::msg)?,
        title: r.get(2)?,
        message: r.get(3)?,
        category: r.get(4)?,
        percentage: r
            .get::<_, Option<String>>(5)?
            .map(|p| parse_decimal(&p))
            .transpose()?,
        date: parse_date(&r.get::<_, String>(6)?)?,
        is_read: r.get(7)?,
        severity: r
            .get::<_, String>(8)?
            .parse::<Severity>()
            .map_err(anyhow::Error::msg)?,
        condition: SpendingInsight::condition_from_key(&r.get::<_, String>(9)?)
            .unwrap_or_default()
            .to_string(),
    })
}
