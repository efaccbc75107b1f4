// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::period::date_range;
use crate::error::EngineError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time bucket used to filter and group ledger records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Period {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(EngineError::InvalidPeriod(other.to_string())),
        }
    }
}

/// How often a recurring definition materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err(EngineError::InvalidFrequency(s.to_string())),
        }
    }
}

/// Display-only ranking of alerts and insights. Ordered low < medium < high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    BankTransfer,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "upi" => Ok(PaymentMethod::Upi),
            "bank_transfer" | "bank-transfer" => Ok(PaymentMethod::BankTransfer),
            "other" => Ok(PaymentMethod::Other),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    BudgetLimit,
    Overspending,
    CategoryLimit,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::BudgetLimit => "budget_limit",
            AlertType::Overspending => "overspending",
            AlertType::CategoryLimit => "category_limit",
        }
    }
}

impl FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "budget_limit" => Ok(AlertType::BudgetLimit),
            "overspending" => Ok(AlertType::Overspending),
            "category_limit" => Ok(AlertType::CategoryLimit),
            _ => Err(format!("Unknown alert type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    SpendingIncrease,
    SpendingDecrease,
    BudgetAlert,
    SavingsTip,
    GoalAchieved,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::SpendingIncrease => "spending_increase",
            InsightType::SpendingDecrease => "spending_decrease",
            InsightType::BudgetAlert => "budget_alert",
            InsightType::SavingsTip => "savings_tip",
            InsightType::GoalAchieved => "goal_achieved",
        }
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spending_increase" => Ok(InsightType::SpendingIncrease),
            "spending_decrease" => Ok(InsightType::SpendingDecrease),
            "budget_alert" => Ok(InsightType::BudgetAlert),
            "savings_tip" => Ok(InsightType::SavingsTip),
            "goal_achieved" => Ok(InsightType::GoalAchieved),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    Streak,
    Savings,
    NoSpend,
    Budget,
    Goal,
    Milestone,
}

impl AchievementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementKind::Streak => "streak",
            AchievementKind::Savings => "savings",
            AchievementKind::NoSpend => "no_spend",
            AchievementKind::Budget => "budget",
            AchievementKind::Goal => "goal",
            AchievementKind::Milestone => "milestone",
        }
    }
}

impl FromStr for AchievementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "streak" => Ok(AchievementKind::Streak),
            "savings" => Ok(AchievementKind::Savings),
            "no_spend" => Ok(AchievementKind::NoSpend),
            "budget" => Ok(AchievementKind::Budget),
            "goal" => Ok(AchievementKind::Goal),
            "milestone" => Ok(AchievementKind::Milestone),
            _ => Err(format!("Unknown achievement type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurring_id: Option<String>,
}

impl Expense {
    pub fn new(id: impl Into<String>, amount: Decimal, category: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            amount,
            category: category.into(),
            date,
            note: None,
            payment_method: None,
            is_recurring: false,
            recurring_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: String,
    pub amount: Decimal,
    pub source: String,
    pub date: NaiveDate,
    pub note: Option<String>,
}

impl Income {
    pub fn new(id: impl Into<String>, amount: Decimal, source: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            amount,
            source: source.into(),
            date,
            note: None,
        }
    }
}

/// A dated monetary entry in the ledger. Expenses bucket by category,
/// incomes by source.
pub trait LedgerRecord {
    fn id(&self) -> &str;
    fn amount(&self) -> Decimal;
    fn bucket(&self) -> &str;
    fn date(&self) -> NaiveDate;

    /// Negative amounts never reach a computation.
    fn validate(&self) -> Result<(), EngineError> {
        if self.amount() < Decimal::ZERO {
            return Err(EngineError::InvalidAmount {
                id: self.id().to_string(),
                amount: self.amount(),
            });
        }
        Ok(())
    }
}

impl LedgerRecord for Expense {
    fn id(&self) -> &str {
        &self.id
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn bucket(&self) -> &str {
        &self.category
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl LedgerRecord for Income {
    fn id(&self) -> &str {
        &self.id
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn bucket(&self) -> &str {
        &self.source
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLimit {
    pub id: String,
    pub category: String,
    pub amount: Decimal,
    pub period: Period,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringExpense {
    pub id: String,
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub next_due_date: NaiveDate,
    pub is_active: bool,
    pub note: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub title: String,
    pub message: String,
    pub category: Option<String>,
    pub amount: Decimal,
    pub limit: Decimal,
    pub period: Period,
    pub date: NaiveDate,
    pub is_read: bool,
    pub severity: Severity,
}

impl SpendingAlert {
    /// Identifies the condition that raised this alert, independent of the
    /// alert's id or the amounts involved. Each period bucket gets its own key.
    pub fn condition_key(&self) -> String {
        condition_key(
            self.period,
            self.date,
            self.alert_type.as_str(),
            self.category.as_deref().unwrap_or("*"),
        )
    }
}

/// `period:bucket_start:type:subject`. The period leads so keys can be
/// filtered by prefix.
fn condition_key(period: Period, date: NaiveDate, kind: &str, subject: &str) -> String {
    let (start, _) = date_range(period, date);
    format!("{}:{}:{}:{}", period, start, kind, subject)
}

/// Prefix shared by every condition key of `period`.
pub fn condition_key_prefix(period: Period) -> String {
    format!("{}:", period)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingInsight {
    pub id: String,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    /// What fired within the type, e.g. `limit:Food`, `top:Food` or
    /// `goal:<id>`.
    #[serde(default)]
    pub condition: String,
    pub title: String,
    pub message: String,
    pub category: Option<String>,
    pub percentage: Option<Decimal>,
    pub date: NaiveDate,
    pub is_read: bool,
    pub severity: Severity,
}

impl SpendingInsight {
    pub fn condition_key(&self, period: Period) -> String {
        condition_key(period, self.date, self.insight_type.as_str(), &self.condition)
    }

    /// Recover the `condition` part of a stored key.
    pub fn condition_from_key(key: &str) -> Option<&str> {
        key.splitn(4, ':').nth(3)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub target_date: Option<NaiveDate>,
    pub created_at: NaiveDate,
    pub is_completed: bool,
    pub completed_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AchievementKind,
    pub title: String,
    pub description: String,
    pub progress: Decimal,
    pub max_progress: Decimal,
    pub is_unlocked: bool,
    pub unlocked_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakData {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_spend_date: Option<NaiveDate>,
    pub no_spend_days: u32,
    pub total_no_spend_days: u32,
    pub current_no_spend_streak: u32,
    pub longest_no_spend_streak: u32,
}
