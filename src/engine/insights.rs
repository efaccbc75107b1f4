// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spending insights: period-over-period category swings, budget proximity,
//! goals at risk or reached, and a dominant category. A period with spending
//! always yields at least one insight.

use crate::engine::aggregate::{percent_of, summarize, summarize_range};
use crate::engine::period::{days_between, is_within_period, previous_period};
use crate::models::{
    BudgetLimit, Category, Expense, Income, InsightType, Period, SavingsGoal, Severity,
    SpendingInsight,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

/// Everything one insight pass looks at.
#[derive(Debug, Clone, Copy)]
pub struct InsightRequest<'a> {
    pub expenses: &'a [Expense],
    /// Incomes feeding the goal-risk check; may be empty.
    pub incomes: &'a [Income],
    /// Preferred display order of categories. Categories not listed follow
    /// alphabetically.
    pub categories: &'a [Category],
    pub period: Period,
    pub reference: NaiveDate,
    pub limits: &'a [BudgetLimit],
    pub goals: &'a [SavingsGoal],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    /// Percent of target reached, capped at 100.
    pub progress: Decimal,
    pub remaining: Decimal,
    pub days_left: i64,
    pub is_on_track: bool,
}

/// Progress toward `goal` measured by net savings (incomes minus expenses)
/// over the records passed in, not a per-goal sub-ledger.
pub fn savings_goal_progress(
    goal: &SavingsGoal,
    incomes: &[Income],
    expenses: &[Expense],
    today: NaiveDate,
) -> GoalProgress {
    let earned: Decimal = incomes.iter().filter(|i| i.amount >= Decimal::ZERO).map(|i| i.amount).sum();
    let spent: Decimal = expenses.iter().filter(|e| e.amount >= Decimal::ZERO).map(|e| e.amount).sum();
    let net = earned - spent;

    let progress = percent_of(net, goal.target_amount)
        .unwrap_or(Decimal::ZERO)
        .min(Decimal::ONE_HUNDRED);
    let remaining = (goal.target_amount - net).max(Decimal::ZERO);

    let Some(target_date) = goal.target_date else {
        return GoalProgress {
            progress,
            remaining,
            days_left: 0,
            is_on_track: false,
        };
    };
    let days_left = days_between(today, target_date).max(0);
    let elapsed = days_between(goal.created_at, today).max(1);
    let daily_actual = net / Decimal::from(elapsed);
    let is_on_track = if days_left == 0 {
        remaining.is_zero()
    } else {
        daily_actual >= remaining / Decimal::from(days_left)
    };

    GoalProgress {
        progress,
        remaining,
        days_left,
        is_on_track,
    }
}

fn increase_severity(change: Decimal) -> Severity {
    if change > Decimal::from(50) {
        Severity::High
    } else if change > Decimal::from(30) {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn insight(
    insight_type: InsightType,
    condition: String,
    title: String,
    message: String,
    category: Option<String>,
    percentage: Option<Decimal>,
    date: NaiveDate,
    severity: Severity,
) -> SpendingInsight {
    SpendingInsight {
        id: Uuid::new_v4().to_string(),
        insight_type,
        condition,
        title,
        message,
        category,
        percentage: percentage.map(|p| p.round_dp(2)),
        date,
        is_read: false,
        severity,
    }
}

pub fn generate_insights(req: &InsightRequest<'_>) -> Vec<SpendingInsight> {
    let period = req.period;
    let today = req.reference;
    let current = summarize(req.expenses, period, today);
    if current.count == 0 {
        return Vec::new();
    }
    let previous = summarize_range(req.expenses, previous_period(period, today));
    let mut out = Vec::new();

    let threshold = Decimal::from(20);
    for category in category_order(req.categories, current.by_category.keys()) {
        let now = current.category_total(category);
        let before = previous.category_total(category);
        let Some(change) = percent_of(now - before, before) else {
            continue;
        };
        if change > threshold {
            out.push(insight(
                InsightType::SpendingIncrease,
                format!("change:{}", category),
                format!("Spending Increase in {}", category),
                format!(
                    "You spent {:.1}% more on {} this {} compared to last {}.",
                    change, category, period, period
                ),
                Some(category.to_string()),
                Some(change),
                today,
                increase_severity(change),
            ));
        } else if change < -threshold {
            out.push(insight(
                InsightType::SpendingDecrease,
                format!("change:{}", category),
                format!("Great Job on {} Spending!", category),
                format!(
                    "You spent {:.1}% less on {} this {} compared to last {}. Keep it up!",
                    change.abs(),
                    category,
                    period,
                    period
                ),
                Some(category.to_string()),
                Some(change),
                today,
                Severity::Low,
            ));
        }
    }

    for limit in req.limits.iter().filter(|l| l.is_active) {
        let spent = current.category_total(&limit.category);
        let Some(used) = percent_of(spent, limit.amount) else {
            continue;
        };
        if used >= Decimal::from(80) {
            let severity = if used >= Decimal::from(90) {
                Severity::High
            } else {
                Severity::Medium
            };
            out.push(insight(
                InsightType::BudgetAlert,
                format!("limit:{}:{}", limit.period, limit.category),
                format!("{} Budget Alert", limit.category),
                format!(
                    "You've used {:.1}% of your {} budget. Consider slowing down spending in this category.",
                    used, limit.category
                ),
                Some(limit.category.clone()),
                Some(used),
                today,
                severity,
            ));
        }
    }

    let period_incomes: Vec<Income> = req
        .incomes
        .iter()
        .filter(|i| is_within_period(i.date, period, today))
        .cloned()
        .collect();
    let period_expenses: Vec<Expense> = req
        .expenses
        .iter()
        .filter(|e| is_within_period(e.date, period, today))
        .cloned()
        .collect();
    for goal in req.goals.iter().filter(|g| !g.is_completed) {
        let gp = savings_goal_progress(goal, &period_incomes, &period_expenses, today);
        if gp.progress > Decimal::from(50) && !gp.is_on_track && gp.days_left < 30 {
            out.push(insight(
                InsightType::SavingsTip,
                format!("goal:{}", goal.id),
                format!("Savings Goal: {}", goal.name),
                format!(
                    "You're {:.1}% of the way to your goal but need to save {:.2} more in {} days.",
                    gp.progress, gp.remaining, gp.days_left
                ),
                None,
                Some(gp.progress),
                today,
                Severity::Medium,
            ));
        }
    }
    for goal in req.goals.iter().filter(|g| {
        g.is_completed
            && g.completed_at
                .is_some_and(|at| is_within_period(at, period, today))
    }) {
        out.push(insight(
            InsightType::GoalAchieved,
            format!("goal:{}", goal.id),
            format!("Goal Achieved: {}", goal.name),
            format!(
                "You reached your {} goal of {:.2}. Time to set the next one!",
                goal.name, goal.target_amount
            ),
            None,
            Some(Decimal::ONE_HUNDRED),
            today,
            Severity::Low,
        ));
    }

    // Ties go to the alphabetically first category.
    let top = current
        .by_category
        .iter()
        .fold(None::<(&String, Decimal)>, |best, (name, amount)| match best {
            Some((_, best_amount)) if best_amount >= *amount => best,
            _ => Some((name, *amount)),
        });
    if let Some((name, amount)) = top {
        if let Some(share) = percent_of(amount, current.total) {
            if share > Decimal::from(40) {
                out.push(insight(
                    InsightType::BudgetAlert,
                    format!("top:{}", name),
                    format!("{} is Your Biggest Expense", name),
                    format!(
                        "{} accounts for {:.1}% of your total spending this {}. Consider reviewing your {} expenses.",
                        name,
                        share,
                        period,
                        name.to_lowercase()
                    ),
                    Some(name.clone()),
                    Some(share),
                    today,
                    Severity::Medium,
                ));
            }
        }
    }

    if out.is_empty() {
        out.push(insight(
            InsightType::SavingsTip,
            "healthy".to_string(),
            "Great Spending Habits!".to_string(),
            format!(
                "Your spending patterns look healthy this {}. Keep tracking your expenses to maintain good financial habits.",
                period
            ),
            None,
            None,
            today,
            Severity::Low,
        ));
    }
    out
}

fn category_order<'a>(
    preferred: &'a [Category],
    seen: impl Iterator<Item = &'a String>,
) -> Vec<&'a str> {
    let seen: Vec<&str> = seen.map(String::as_str).collect();
    let mut order: Vec<&str> = preferred
        .iter()
        .map(|c| c.name.as_str())
        .filter(|name| seen.contains(name))
        .collect();
    for name in seen {
        if !order.contains(&name) {
            order.push(name);
        }
    }
    order
}

pub fn suppress_notified(
    insights: Vec<SpendingInsight>,
    period: Period,
    notified: &HashSet<String>,
) -> Vec<SpendingInsight> {
    insights
        .into_iter()
        .filter(|i| !notified.contains(&i.condition_key(period)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn e(id: &str, amount: i64, category: &str, date: NaiveDate) -> Expense {
        Expense::new(id, Decimal::from(amount), category, date)
    }

    fn request<'a>(expenses: &'a [Expense], reference: NaiveDate) -> InsightRequest<'a> {
        InsightRequest {
            expenses,
            incomes: &[],
            categories: &[],
            period: Period::Month,
            reference,
            limits: &[],
            goals: &[],
        }
    }

    fn kinds(insights: &[SpendingInsight]) -> Vec<InsightType> {
        insights.iter().map(|i| i.insight_type).collect()
    }

    #[test]
    fn empty_period_yields_nothing() {
        let expenses = vec![e("old", 10, "Food", d(2025, 6, 1))];
        assert!(generate_insights(&request(&expenses, d(2025, 8, 15))).is_empty());
    }

    #[test]
    fn large_increase_is_high_severity() {
        let expenses = vec![
            e("a", 100, "Food", d(2025, 7, 10)),
            e("b", 160, "Food", d(2025, 8, 10)),
            e("c", 100, "Rent", d(2025, 7, 1)),
            e("d", 100, "Rent", d(2025, 8, 1)),
            e("f", 200, "Travel", d(2025, 8, 2)),
        ];
        let out = generate_insights(&request(&expenses, d(2025, 8, 15)));
        let inc = out
            .iter()
            .find(|i| i.insight_type == InsightType::SpendingIncrease)
            .unwrap();
        assert_eq!(inc.category.as_deref(), Some("Food"));
        assert_eq!(inc.percentage, Some(Decimal::from(60)));
        assert_eq!(inc.severity, Severity::High);
        // Rent unchanged, Travel has no history
        assert_eq!(
            out.iter()
                .filter(|i| matches!(
                    i.insight_type,
                    InsightType::SpendingIncrease | InsightType::SpendingDecrease
                ))
                .count(),
            1
        );
    }

    #[test]
    fn decrease_is_always_low() {
        let expenses = vec![
            e("a", 100, "Food", d(2025, 7, 10)),
            e("b", 50, "Food", d(2025, 8, 10)),
            e("c", 60, "Rent", d(2025, 8, 1)),
            e("g", 60, "Fun", d(2025, 8, 1)),
        ];
        let out = generate_insights(&request(&expenses, d(2025, 8, 15)));
        let dec = out
            .iter()
            .find(|i| i.insight_type == InsightType::SpendingDecrease)
            .unwrap();
        assert_eq!(dec.severity, Severity::Low);
        assert_eq!(dec.percentage, Some(Decimal::from(-50)));
    }

    #[test]
    fn budget_proximity_thresholds() {
        let expenses = vec![
            e("a", 85, "Food", d(2025, 8, 10)),
            e("b", 95, "Rent", d(2025, 8, 10)),
            e("c", 70, "Fun", d(2025, 8, 10)),
            e("h", 60, "Misc", d(2025, 8, 10)),
        ];
        let limit = |cat: &str| BudgetLimit {
            id: cat.into(),
            category: cat.into(),
            amount: Decimal::from(100),
            period: Period::Month,
            is_active: true,
        };
        let limits = vec![limit("Food"), limit("Rent"), limit("Fun")];
        let mut req = request(&expenses, d(2025, 8, 15));
        req.limits = &limits;
        let out = generate_insights(&req);
        let budget: Vec<_> = out
            .iter()
            .filter(|i| i.insight_type == InsightType::BudgetAlert)
            .collect();
        assert_eq!(budget.len(), 2);
        assert_eq!(budget[0].category.as_deref(), Some("Food"));
        assert_eq!(budget[0].severity, Severity::Medium);
        assert_eq!(budget[1].category.as_deref(), Some("Rent"));
        assert_eq!(budget[1].severity, Severity::High);
    }

    #[test]
    fn dominant_category_flagged() {
        let expenses = vec![
            e("a", 50, "Food", d(2025, 8, 10)),
            e("b", 30, "Rent", d(2025, 8, 10)),
            e("c", 20, "Fun", d(2025, 8, 10)),
        ];
        let out = generate_insights(&request(&expenses, d(2025, 8, 15)));
        assert_eq!(kinds(&out), vec![InsightType::BudgetAlert]);
        assert_eq!(out[0].category.as_deref(), Some("Food"));
        assert_eq!(out[0].percentage, Some(Decimal::from(50)));
    }

    #[test]
    fn balanced_spending_gets_fallback() {
        let expenses = vec![
            e("a", 30, "Food", d(2025, 8, 10)),
            e("b", 30, "Rent", d(2025, 8, 10)),
            e("c", 40, "Fun", d(2025, 8, 10)),
        ];
        let out = generate_insights(&request(&expenses, d(2025, 8, 15)));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].insight_type, InsightType::SavingsTip);
        assert_eq!(out[0].severity, Severity::Low);
    }

    #[test]
    fn preferred_category_order_is_respected() {
        let expenses = vec![
            e("a", 100, "Alpha", d(2025, 7, 10)),
            e("b", 200, "Alpha", d(2025, 8, 10)),
            e("c", 100, "Zeta", d(2025, 7, 10)),
            e("d", 200, "Zeta", d(2025, 8, 10)),
        ];
        let categories = vec![Category {
            id: "z".into(),
            name: "Zeta".into(),
        }];
        let mut req = request(&expenses, d(2025, 8, 15));
        req.categories = &categories;
        let out = generate_insights(&req);
        assert_eq!(out[0].category.as_deref(), Some("Zeta"));
        assert_eq!(out[1].category.as_deref(), Some("Alpha"));
    }

    fn goal(target: i64, created: NaiveDate, due: Option<NaiveDate>) -> SavingsGoal {
        SavingsGoal {
            id: "g".into(),
            name: "Laptop".into(),
            target_amount: Decimal::from(target),
            current_amount: Decimal::ZERO,
            target_date: due,
            created_at: created,
            is_completed: false,
            completed_at: None,
        }
    }

    #[test]
    fn goal_progress_math() {
        let today = d(2025, 8, 15);
        let incomes = vec![Income::new("i", Decimal::from(1000), "Salary", d(2025, 8, 1))];
        let expenses = vec![e("a", 400, "Food", d(2025, 8, 2))];

        let gp = savings_goal_progress(&goal(1000, d(2025, 8, 5), Some(d(2025, 8, 25))), &incomes, &expenses, today);
        assert_eq!(gp.progress, Decimal::from(60));
        assert_eq!(gp.remaining, Decimal::from(400));
        assert_eq!(gp.days_left, 10);
        // 600 over 10 days = 60/day, need 40/day
        assert!(gp.is_on_track);

        let capped = savings_goal_progress(&goal(100, d(2025, 8, 5), None), &incomes, &expenses, today);
        assert_eq!(capped.progress, Decimal::from(100));
        assert_eq!(capped.remaining, Decimal::ZERO);
        assert!(!capped.is_on_track);

        let past_due = savings_goal_progress(&goal(1000, d(2025, 8, 5), Some(d(2025, 8, 1))), &incomes, &expenses, today);
        assert_eq!(past_due.days_left, 0);
        assert!(!past_due.is_on_track);

        let zero_target = savings_goal_progress(&goal(0, d(2025, 8, 5), None), &incomes, &expenses, today);
        assert_eq!(zero_target.progress, Decimal::ZERO);
    }

    #[test]
    fn goal_at_risk_produces_tip() {
        let today = d(2025, 8, 15);
        let incomes = vec![Income::new("i", Decimal::from(700), "Salary", d(2025, 8, 1))];
        let expenses = vec![
            e("a", 30, "Food", d(2025, 8, 2)),
            e("b", 35, "Rent", d(2025, 8, 2)),
            e("c", 35, "Fun", d(2025, 8, 2)),
        ];
        // net 600 of 1000 over 100 days => 6/day, need 400 in 10 days
        let goals = vec![goal(1000, d(2025, 5, 7), Some(d(2025, 8, 25)))];
        let mut req = request(&expenses, today);
        req.incomes = &incomes;
        req.goals = &goals;
        let out = generate_insights(&req);
        assert_eq!(kinds(&out), vec![InsightType::SavingsTip]);
        assert_eq!(out[0].severity, Severity::Medium);
        assert!(out[0].message.contains("400.00"));
    }

    #[test]
    fn completed_goal_in_period_is_celebrated() {
        let expenses = vec![
            e("a", 30, "Food", d(2025, 8, 2)),
            e("b", 35, "Rent", d(2025, 8, 2)),
            e("c", 35, "Fun", d(2025, 8, 2)),
        ];
        let mut done = goal(500, d(2025, 5, 1), None);
        done.is_completed = true;
        done.completed_at = Some(d(2025, 8, 12));
        let mut earlier = done.clone();
        earlier.id = "old".into();
        earlier.completed_at = Some(d(2025, 7, 30));
        let goals = vec![done, earlier];
        let mut req = request(&expenses, d(2025, 8, 15));
        req.goals = &goals;
        let out = generate_insights(&req);
        assert_eq!(kinds(&out), vec![InsightType::GoalAchieved]);
        assert_eq!(out[0].condition, "goal:g");
        assert_eq!(out[0].severity, Severity::Low);
    }

    #[test]
    fn distinct_conditions_get_distinct_keys() {
        let expenses = vec![e("a", 95, "Food", d(2025, 8, 10)), e("b", 5, "Fun", d(2025, 8, 10))];
        let limits = vec![BudgetLimit {
            id: "l".into(),
            category: "Food".into(),
            amount: Decimal::from(100),
            period: Period::Month,
            is_active: true,
        }];
        let mut req = request(&expenses, d(2025, 8, 15));
        req.limits = &limits;
        let out = generate_insights(&req);
        assert_eq!(kinds(&out), vec![InsightType::BudgetAlert, InsightType::BudgetAlert]);
        let keys: HashSet<String> = out.iter().map(|i| i.condition_key(Period::Month)).collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("month:2025-08-01:budget_alert:limit:month:Food"));
        assert!(keys.contains("month:2025-08-01:budget_alert:top:Food"));
    }

    #[test]
    fn insight_suppression_uses_condition_key() {
        let expenses = vec![e("a", 50, "Food", d(2025, 8, 10))];
        let out = generate_insights(&request(&expenses, d(2025, 8, 15)));
        let mut notified = HashSet::new();
        notified.insert(out[0].condition_key(Period::Month));
        assert!(suppress_notified(out, Period::Month, &notified).is_empty());
    }
}
