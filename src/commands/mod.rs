// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod achievements;
pub mod alerts;
pub mod doctor;
pub mod expenses;
pub mod goals;
pub mod incomes;
pub mod insights;
pub mod limits;
pub mod recurring;
pub mod reports;
pub mod settings;
pub mod streaks;
