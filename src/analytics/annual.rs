// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::mei::percentage_of;
use crate::models::{Transaction, TransactionType};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnualLimitStatus {
    pub year: i32,
    pub revenue: Decimal,
    pub limit: Decimal,
    pub used_percentage: Decimal,
    pub remaining: Decimal,
}

impl AnnualLimitStatus {
    pub fn exceeded(&self) -> bool {
        !self.limit.is_zero() && self.revenue > self.limit
    }
}

/// Revenue booked in `year` against the MEI annual revenue ceiling.
pub fn annual_limit_status(
    transactions: &[Transaction],
    year: i32,
    annual_limit: Decimal,
) -> AnnualLimitStatus {
    let revenue = transactions
        .iter()
        .filter(|t| t.r#type == TransactionType::Income && t.date.year() == year)
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount));
    AnnualLimitStatus {
        year,
        revenue,
        limit: annual_limit,
        used_percentage: percentage_of(revenue, annual_limit),
        remaining: annual_limit.saturating_sub(revenue).max(Decimal::ZERO),
    }
}
