// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::period::{date_range, is_within_range};
use crate::error::{EngineError, Result};
use crate::models::{Expense, Income, LedgerRecord, Period};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A record left out of an aggregate because it failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub total: Decimal,
    /// Keyed by category for expenses and by source for incomes.
    pub by_category: BTreeMap<String, Decimal>,
    pub by_date: BTreeMap<NaiveDate, Decimal>,
    pub count: usize,
    pub rejected: Vec<RejectedRecord>,
}

impl LedgerSummary {
    pub fn category_total(&self, category: &str) -> Decimal {
        self.by_category.get(category).copied().unwrap_or(Decimal::ZERO)
    }
}

pub fn summarize<R: LedgerRecord>(records: &[R], period: Period, reference: NaiveDate) -> LedgerSummary {
    summarize_range(records, date_range(period, reference))
}

/// Sum records dated inside the inclusive `range`. Invalid records are
/// reported in `rejected` and do not contribute.
pub fn summarize_range<R: LedgerRecord>(records: &[R], range: (NaiveDate, NaiveDate)) -> LedgerSummary {
    let mut summary = LedgerSummary::default();
    for r in records.iter().filter(|r| is_within_range(r.date(), range)) {
        if let Err(e) = r.validate() {
            summary.rejected.push(RejectedRecord {
                id: r.id().to_string(),
                reason: e.to_string(),
            });
            continue;
        }
        let amount = r.amount();
        summary.total += amount;
        summary.count += 1;
        *summary
            .by_category
            .entry(r.bucket().to_string())
            .or_insert(Decimal::ZERO) += amount;
        *summary.by_date.entry(r.date()).or_insert(Decimal::ZERO) += amount;
    }
    summary
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_savings: Decimal,
    /// Percent of income kept; zero when there is no income.
    pub savings_rate: Decimal,
    pub period: Period,
}

pub fn financial_summary(
    expenses: &[Expense],
    incomes: &[Income],
    period: Period,
    reference: NaiveDate,
) -> FinancialSummary {
    let total_expenses = summarize(expenses, period, reference).total;
    let total_income = summarize(incomes, period, reference).total;
    let net_savings = total_income - total_expenses;
    let savings_rate = percent_of(net_savings, total_income).unwrap_or(Decimal::ZERO);
    FinancialSummary {
        total_income,
        total_expenses,
        net_savings,
        savings_rate,
        period,
    }
}

/// `part / whole * 100`, or `None` when `whole` is zero.
pub fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
}

/// Label of the `period`-sized bucket a date falls in: `2025-08-14`,
/// `2025-W33`, `2025-08`, `2025`.
pub fn bucket_key(date: NaiveDate, period: Period) -> String {
    match period {
        Period::Day => date.format("%Y-%m-%d").to_string(),
        Period::Week => {
            let iso = date.iso_week();
            format!("{}-W{:02}", iso.year(), iso.week())
        }
        Period::Month => date.format("%Y-%m").to_string(),
        Period::Year => date.format("%Y").to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub key: String,
    pub value: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub bucket: Period,
    pub points: Vec<ChartPoint>,
    pub categories: Vec<String>,
    pub total: Decimal,
}

/// Spending between `start` and `end` (inclusive) grouped into buckets,
/// ordered by bucket key.
pub fn chart_series(expenses: &[Expense], bucket: Period, start: NaiveDate, end: NaiveDate) -> ChartData {
    let mut grouped: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();
    let mut categories = BTreeSet::new();
    let mut total = Decimal::ZERO;
    for e in expenses
        .iter()
        .filter(|e| is_within_range(e.date, (start, end)) && e.validate().is_ok())
    {
        let slot = grouped
            .entry(bucket_key(e.date, bucket))
            .or_insert((Decimal::ZERO, 0));
        slot.0 += e.amount;
        slot.1 += 1;
        total += e.amount;
        categories.insert(e.category.clone());
    }
    ChartData {
        bucket,
        points: grouped
            .into_iter()
            .map(|(key, (value, count))| ChartPoint { key, value, count })
            .collect(),
        categories: categories.into_iter().collect(),
        total,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub expenses: Vec<Expense>,
    pub total: Decimal,
    pub has_overspending: bool,
    pub is_no_spend_day: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarView {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

/// One entry per day of the month. A day is overspent when its total
/// exceeds `daily_allowance`; without an allowance no day is.
pub fn calendar_month(
    expenses: &[Expense],
    year: i32,
    month: u32,
    daily_allowance: Option<Decimal>,
) -> Result<CalendarView> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::DateOutOfRange(format!("{}-{:02}", year, month)))?;
    let (start, end) = date_range(Period::Month, first);

    let mut by_day: BTreeMap<NaiveDate, Vec<Expense>> = BTreeMap::new();
    for e in expenses
        .iter()
        .filter(|e| is_within_range(e.date, (start, end)) && e.validate().is_ok())
    {
        by_day.entry(e.date).or_default().push(e.clone());
    }

    let days = start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| {
            let day_expenses = by_day.remove(&date).unwrap_or_default();
            let total: Decimal = day_expenses.iter().map(|e| e.amount).sum();
            CalendarDay {
                date,
                is_no_spend_day: day_expenses.is_empty(),
                has_overspending: daily_allowance.is_some_and(|cap| total > cap),
                expenses: day_expenses,
                total,
            }
        })
        .collect();

    Ok(CalendarView { year, month, days })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ledger() -> Vec<Expense> {
        vec![
            Expense::new("e1", dec("12.50"), "Food", d(2025, 8, 3)),
            Expense::new("e2", dec("7.50"), "Food", d(2025, 8, 3)),
            Expense::new("e3", dec("40"), "Travel", d(2025, 8, 20)),
            Expense::new("e4", dec("99"), "Food", d(2025, 7, 31)),
        ]
    }

    #[test]
    fn summarize_month() {
        let s = summarize(&ledger(), Period::Month, d(2025, 8, 15));
        assert_eq!(s.total, dec("60"));
        assert_eq!(s.count, 3);
        assert_eq!(s.category_total("Food"), dec("20"));
        assert_eq!(s.category_total("Travel"), dec("40"));
        assert_eq!(s.by_date.get(&d(2025, 8, 3)), Some(&dec("20")));
        assert!(s.rejected.is_empty());
    }

    #[test]
    fn summarize_empty_period_is_zero() {
        let s = summarize(&ledger(), Period::Day, d(2025, 8, 4));
        assert_eq!(s.total, Decimal::ZERO);
        assert_eq!(s.count, 0);
        assert!(s.by_category.is_empty());
        assert!(s.by_date.is_empty());
    }

    #[test]
    fn negative_amount_is_rejected_not_fatal() {
        let mut records = ledger();
        records.push(Expense::new("bad", dec("-5"), "Food", d(2025, 8, 5)));
        let s = summarize(&records, Period::Month, d(2025, 8, 15));
        assert_eq!(s.total, dec("60"));
        assert_eq!(s.count, 3);
        assert_eq!(s.rejected.len(), 1);
        assert_eq!(s.rejected[0].id, "bad");
    }

    #[test]
    fn income_buckets_by_source() {
        let incomes = vec![
            Income::new("i1", dec("1000"), "Salary", d(2025, 8, 1)),
            Income::new("i2", dec("200"), "Freelance", d(2025, 8, 9)),
        ];
        let s = summarize(&incomes, Period::Month, d(2025, 8, 15));
        assert_eq!(s.category_total("Salary"), dec("1000"));
        assert_eq!(s.total, dec("1200"));
    }

    #[test]
    fn financial_summary_rates() {
        let incomes = vec![Income::new("i1", dec("200"), "Salary", d(2025, 8, 1))];
        let fs = financial_summary(&ledger(), &incomes, Period::Month, d(2025, 8, 15));
        assert_eq!(fs.net_savings, fs.total_income - fs.total_expenses);
        assert_eq!(fs.net_savings, dec("140"));
        assert_eq!(fs.savings_rate, dec("70"));

        let fs = financial_summary(&ledger(), &[], Period::Month, d(2025, 8, 15));
        assert_eq!(fs.savings_rate, Decimal::ZERO);
        assert_eq!(fs.net_savings, dec("-60"));
    }

    #[test]
    fn chart_groups_by_month() {
        let chart = chart_series(&ledger(), Period::Month, d(2025, 7, 1), d(2025, 8, 31));
        let keys: Vec<_> = chart.points.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["2025-07", "2025-08"]);
        assert_eq!(chart.points[1].value, dec("60"));
        assert_eq!(chart.points[1].count, 3);
        assert_eq!(chart.total, dec("159"));
        assert_eq!(chart.categories, vec!["Food".to_string(), "Travel".to_string()]);
    }

    #[test]
    fn week_bucket_uses_iso_week() {
        assert_eq!(bucket_key(d(2025, 8, 14), Period::Week), "2025-W33");
        assert_eq!(bucket_key(d(2024, 12, 30), Period::Week), "2025-W01");
    }

    #[test]
    fn calendar_flags_days() {
        let view = calendar_month(&ledger(), 2025, 8, Some(dec("30"))).unwrap();
        assert_eq!(view.days.len(), 31);
        let third = &view.days[2];
        assert_eq!(third.total, dec("20"));
        assert!(!third.is_no_spend_day);
        assert!(!third.has_overspending);
        let twentieth = &view.days[19];
        assert!(twentieth.has_overspending);
        assert!(view.days[0].is_no_spend_day);

        assert!(calendar_month(&ledger(), 2025, 13, None).is_err());
    }
}
