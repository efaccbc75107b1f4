// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The analytics core. Every function here is pure: it takes the ledger
//! snapshot and a reference day as arguments, returns new values, and never
//! touches storage or logs.

pub mod aggregate;
pub mod alerts;
pub mod gamification;
pub mod insights;
pub mod period;
pub mod recurring;

pub use aggregate::{
    calendar_month, chart_series, financial_summary, summarize, CalendarView, ChartData,
    FinancialSummary, LedgerSummary,
};
pub use alerts::{check_budget_limits, check_overspending};
pub use gamification::{check_achievements, compute_streaks, AchievementInput};
pub use insights::{generate_insights, savings_goal_progress, GoalProgress, InsightRequest};
pub use period::{add_by_frequency, date_range, is_same_calendar_day, is_within_period, previous_period};
pub use recurring::{advance, generate_due_instances, is_due, materialize_due, RecurringRun};
