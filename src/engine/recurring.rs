// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Recurring expense scheduling.
//!
//! A definition sits in its scheduled state until `next_due_date` is on or
//! before today. Each run then yields exactly one concrete expense dated
//! today and moves `next_due_date` forward by one cycle from the old due
//! date, never from today. Missed cycles are caught up one per run.
//! Inactive definitions, and definitions whose next due date has passed
//! their end date, produce nothing and keep their dates.

use crate::engine::period::add_by_frequency;
use crate::error::{EngineError, Result};
use crate::models::{Expense, RecurringExpense};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

/// True once the next cycle would fall after the definition's end date.
pub fn is_expired(def: &RecurringExpense) -> bool {
    def.end_date.is_some_and(|end| def.next_due_date > end)
}

pub fn is_due(def: &RecurringExpense, today: NaiveDate) -> bool {
    def.is_active && def.next_due_date <= today && !is_expired(def)
}

/// One fresh expense per due definition. The caller runs this at most once
/// per day; nothing here checks for instances generated earlier.
pub fn generate_due_instances(defs: &[RecurringExpense], today: NaiveDate) -> Vec<Expense> {
    defs.iter()
        .filter(|def| is_due(def, today) && def.amount >= Decimal::ZERO)
        .map(|def| instance_for(def, today))
        .collect()
}

/// Move `next_due_date` forward by one cycle. Pair every call with exactly
/// one generated instance, or cycles are skipped.
pub fn advance(def: &RecurringExpense) -> Result<RecurringExpense> {
    let mut next = def.clone();
    next.next_due_date = add_by_frequency(def.next_due_date, def.frequency)?;
    Ok(next)
}

#[derive(Debug, Default)]
pub struct RecurringRun {
    /// Instance to persist alongside the advanced definition that replaces
    /// the stored one.
    pub generated: Vec<(Expense, RecurringExpense)>,
    pub failed: Vec<(String, EngineError)>,
}

/// Generate and advance together so the host can persist each pair
/// atomically. A definition that cannot be advanced or carries a negative
/// amount is reported in `failed` and produces no instance.
pub fn materialize_due(defs: &[RecurringExpense], today: NaiveDate) -> RecurringRun {
    let mut run = RecurringRun::default();
    for def in defs.iter().filter(|def| is_due(def, today)) {
        if def.amount < Decimal::ZERO {
            run.failed.push((
                def.id.clone(),
                EngineError::InvalidAmount {
                    id: def.id.clone(),
                    amount: def.amount,
                },
            ));
            continue;
        }
        match advance(def) {
            Ok(next) => run.generated.push((instance_for(def, today), next)),
            Err(e) => run.failed.push((def.id.clone(), e)),
        }
    }
    run
}

fn instance_for(def: &RecurringExpense, today: NaiveDate) -> Expense {
    Expense {
        id: Uuid::new_v4().to_string(),
        amount: def.amount,
        category: def.category.clone(),
        date: today,
        note: def.note.clone().or_else(|| Some(def.title.clone())),
        payment_method: def.payment_method,
        is_recurring: true,
        recurring_id: Some(def.id.clone()),
    }
}
