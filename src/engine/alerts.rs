// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::aggregate::{percent_of, summarize};
use crate::models::{AlertType, BudgetLimit, Expense, Period, Severity, SpendingAlert};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashSet;
use uuid::Uuid;

/// Severity of a breach given spend as a percentage of its limit:
/// above 150% is high, above 120% medium, any other overage low.
pub fn overage_severity(percentage: Decimal) -> Severity {
    if percentage > Decimal::from(150) {
        Severity::High
    } else if percentage > Decimal::from(120) {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// One `budget_limit` alert per active limit whose category spend in the
/// `period` bucket around `reference` is strictly above the limit.
///
/// Every active limit is measured over `period`; callers holding limits of
/// several periods call once per period with the matching limits.
pub fn check_budget_limits(
    expenses: &[Expense],
    limits: &[BudgetLimit],
    period: Period,
    reference: NaiveDate,
) -> Vec<SpendingAlert> {
    let summary = summarize(expenses, period, reference);
    limits
        .iter()
        .filter(|limit| limit.is_active)
        .filter_map(|limit| {
            let spent = summary.category_total(&limit.category);
            if spent <= limit.amount {
                return None;
            }
            let pct = percent_of(spent, limit.amount);
            let severity = pct.map(overage_severity).unwrap_or(Severity::High);
            let over = spent - limit.amount;
            let message = match pct {
                Some(p) => format!(
                    "You've exceeded your {} budget by {:.2} ({:.1}% of the {} limit)",
                    limit.category, over, p, period
                ),
                None => format!(
                    "You've spent {:.2} on {} this {} against a zero limit",
                    spent, limit.category, period
                ),
            };
            Some(SpendingAlert {
                id: Uuid::new_v4().to_string(),
                alert_type: AlertType::BudgetLimit,
                title: "Budget Limit Exceeded".to_string(),
                message,
                category: Some(limit.category.clone()),
                amount: spent,
                limit: limit.amount,
                period,
                date: reference,
                is_read: false,
                severity,
            })
        })
        .collect()
}

/// Share of a monthly budget that applies to one `period` bucket.
pub fn budget_for_period(monthly_budget: Decimal, period: Period) -> Decimal {
    match period {
        Period::Day => monthly_budget / Decimal::from(30),
        Period::Week => monthly_budget / Decimal::from(4),
        Period::Month => monthly_budget,
        Period::Year => monthly_budget * Decimal::from(12),
    }
}

/// Compare total spend in the `period` bucket with the monthly budget scaled
/// to that period. No budget (or a zero budget) means no alert.
pub fn check_overspending(
    expenses: &[Expense],
    monthly_budget: Option<Decimal>,
    period: Period,
    reference: NaiveDate,
) -> Vec<SpendingAlert> {
    let Some(monthly) = monthly_budget.filter(|b| *b > Decimal::ZERO) else {
        return Vec::new();
    };
    let period_budget = budget_for_period(monthly, period);
    let spent = summarize(expenses, period, reference).total;
    if spent <= period_budget {
        return Vec::new();
    }
    let severity = percent_of(spent, period_budget)
        .map(overage_severity)
        .unwrap_or(Severity::High);
    vec![SpendingAlert {
        id: Uuid::new_v4().to_string(),
        alert_type: AlertType::Overspending,
        title: "Overspending Alert".to_string(),
        message: format!(
            "You've spent {:.2} this {}, which is {:.2} over your budget",
            spent,
            period,
            spent - period_budget
        ),
        category: None,
        amount: spent,
        limit: period_budget.round_dp(2),
        period,
        date: reference,
        is_read: false,
        severity,
    }]
}

/// Drop alerts whose condition is already in `notified`, so an unchanged
/// condition is reported once.
pub fn suppress_notified(alerts: Vec<SpendingAlert>, notified: &HashSet<String>) -> Vec<SpendingAlert> {
    alerts
        .into_iter()
        .filter(|a| !notified.contains(&a.condition_key()))
        .collect()
}
