// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error types for the analytics engine.
//!
//! Zero denominators (no income, no days left, an empty previous period)
//! are not errors: the engine special-cases them and returns zero or skips
//! the comparison.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid recurrence frequency '{0}', expected daily|weekly|monthly|yearly")]
    InvalidFrequency(String),

    #[error("Invalid period '{0}', expected day|week|month|year")]
    InvalidPeriod(String),

    #[error("Invalid amount {amount} on record '{id}'")]
    InvalidAmount { id: String, amount: Decimal },

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
