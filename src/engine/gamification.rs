// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Streaks and achievements, recomputed from the whole ledger on every call.

use crate::engine::alerts::budget_for_period;
use crate::models::{Achievement, AchievementKind, Expense, Period, SavingsGoal, StreakData};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_HORIZON_DAYS: u32 = 365;

/// Days the scan covers, newest first: from `reference` back `horizon_days`
/// days, but never before the first recorded expense.
fn scan_window(first: NaiveDate, reference: NaiveDate, horizon_days: u32) -> impl Iterator<Item = NaiveDate> {
    let horizon_start = reference
        .checked_sub_days(Days::new(u64::from(horizon_days.saturating_sub(1))))
        .unwrap_or(NaiveDate::MIN);
    let start = horizon_start.max(first);
    let len = if horizon_days == 0 || start > reference {
        0
    } else {
        (reference - start).num_days() as u64 + 1
    };
    (0..len).filter_map(move |back| reference.checked_sub_days(Days::new(back)))
}

pub fn compute_streaks(expenses: &[Expense], reference: NaiveDate, horizon_days: u32) -> StreakData {
    let spend_days: BTreeSet<NaiveDate> = expenses
        .iter()
        .filter(|e| e.amount >= Decimal::ZERO && e.date <= reference)
        .map(|e| e.date)
        .collect();
    let Some(&first) = spend_days.first() else {
        return StreakData::default();
    };

    let mut data = StreakData {
        last_spend_date: spend_days.last().copied(),
        ..StreakData::default()
    };
    let mut run = 0u32;
    let mut dry_run = 0u32;
    let mut spend_open = true;
    let mut dry_open = true;

    for day in scan_window(first, reference, horizon_days) {
        if spend_days.contains(&day) {
            run += 1;
            dry_run = 0;
            data.longest_streak = data.longest_streak.max(run);
            dry_open = false;
            if spend_open {
                data.current_streak = run;
            }
        } else {
            dry_run += 1;
            run = 0;
            data.total_no_spend_days += 1;
            data.longest_no_spend_streak = data.longest_no_spend_streak.max(dry_run);
            spend_open = false;
            if dry_open {
                data.current_no_spend_streak = dry_run;
            }
        }
    }
    data.no_spend_days = data.total_no_spend_days;
    data
}

/// Consecutive days ending on `reference` whose spend stays within
/// `daily_allowance`. Days before the first expense do not count.
pub fn days_within_budget(
    expenses: &[Expense],
    reference: NaiveDate,
    daily_allowance: Decimal,
    horizon_days: u32,
) -> u32 {
    let mut per_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for e in expenses.iter().filter(|e| e.amount >= Decimal::ZERO && e.date <= reference) {
        *per_day.entry(e.date).or_insert(Decimal::ZERO) += e.amount;
    }
    let Some((&first, _)) = per_day.first_key_value() else {
        return 0;
    };
    let mut count = 0;
    for day in scan_window(first, reference, horizon_days) {
        if per_day.get(&day).copied().unwrap_or(Decimal::ZERO) > daily_allowance {
            break;
        }
        count += 1;
    }
    count
}

/// Inputs the achievement signals are computed from.
#[derive(Debug, Clone, Copy)]
pub struct AchievementInput<'a> {
    pub expenses: &'a [Expense],
    pub goals: &'a [SavingsGoal],
    pub reference: NaiveDate,
    /// Needed by `budget` achievements; without it they are left as is.
    pub monthly_budget: Option<Decimal>,
    pub horizon_days: u32,
}

impl<'a> AchievementInput<'a> {
    pub fn new(expenses: &'a [Expense], goals: &'a [SavingsGoal], reference: NaiveDate) -> Self {
        Self {
            expenses,
            goals,
            reference,
            monthly_budget: None,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }

    pub fn with_monthly_budget(mut self, budget: Option<Decimal>) -> Self {
        self.monthly_budget = budget;
        self
    }
}

/// Refresh progress of every locked achievement and unlock those that reach
/// their maximum. Unlocked achievements come back untouched, whatever the
/// ledger now says.
pub fn check_achievements(input: &AchievementInput<'_>, current: &[Achievement]) -> Vec<Achievement> {
    let streaks = compute_streaks(input.expenses, input.reference, input.horizon_days);
    let total_saved: Decimal = input
        .goals
        .iter()
        .map(|g| g.current_amount.max(Decimal::ZERO))
        .sum();
    let completed_goals = input.goals.iter().filter(|g| g.is_completed).count();
    let budget_days = input
        .monthly_budget
        .filter(|b| *b > Decimal::ZERO)
        .map(|b| {
            days_within_budget(
                input.expenses,
                input.reference,
                budget_for_period(b, Period::Day),
                input.horizon_days,
            )
        });

    current
        .iter()
        .map(|a| {
            if a.is_unlocked {
                return a.clone();
            }
            let signal = match a.kind {
                AchievementKind::Streak => Some(Decimal::from(streaks.current_streak)),
                AchievementKind::Savings => Some(total_saved),
                AchievementKind::NoSpend => Some(if streaks.no_spend_days > 0 {
                    Decimal::ONE
                } else {
                    Decimal::ZERO
                }),
                AchievementKind::Goal => Some(Decimal::from(completed_goals)),
                AchievementKind::Budget => budget_days.map(Decimal::from),
                AchievementKind::Milestone => None,
            };
            let Some(signal) = signal else {
                return a.clone();
            };
            let mut next = a.clone();
            next.progress = signal.max(Decimal::ZERO).min(a.max_progress);
            if next.progress >= next.max_progress {
                next.is_unlocked = true;
                next.unlocked_at = Some(input.reference);
            }
            next
        })
        .collect()
}

/// Achievements every new profile starts with.
pub fn default_achievements() -> Vec<Achievement> {
    let make = |id: &str, kind, title: &str, description: &str, max: i64| Achievement {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        description: description.to_string(),
        progress: Decimal::ZERO,
        max_progress: Decimal::from(max),
        is_unlocked: false,
        unlocked_at: None,
    };
    vec![
        make("first-steps", AchievementKind::Streak, "First Steps", "Track expenses for 7 consecutive days", 7),
        make("saver", AchievementKind::Savings, "Saver", "Save 10,000 in total", 10_000),
        make("no-spend-day", AchievementKind::NoSpend, "No Spend Day", "Complete a day without any expenses", 1),
        make("budget-master", AchievementKind::Budget, "Budget Master", "Stay within budget for 30 consecutive days", 30),
        make("goal-achiever", AchievementKind::Goal, "Goal Achiever", "Complete your first savings goal", 1),
    ]
}
