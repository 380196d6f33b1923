// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Validation failures raised at the entry layer (CLI, CSV import, store rows).
#[derive(Debug, Error, PartialEq)]
pub enum FinanceError {
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Invalid period '{0}', expected today|this-week|this-month|custom-month|always")]
    InvalidPeriod(String),
    #[error("Invalid transaction type '{0}', expected income|expense|transfer")]
    InvalidTransactionType(String),
    #[error("Amount must not be negative (got {0})")]
    NegativeAmount(Decimal),
    #[error("Bill {0} is marked paid but has no paid date")]
    PaidWithoutDate(i64),
    #[error("Bill {id} has installment {index} of {total}")]
    InstallmentOutOfRange { id: i64, index: u32, total: u32 },
    #[error("Installment count must be at least 1 (got {0})")]
    InvalidInstallmentCount(u32),
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },
}
