// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TransactionType, YearMonth};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    /// Running income minus expense since the first day of the month.
    pub balance: Decimal,
}

/// One point per calendar day of `period`. Transfers are left out.
pub fn daily_series(transactions: &[Transaction], period: YearMonth) -> Vec<DailyPoint> {
    let mut balance = Decimal::ZERO;
    period
        .days()
        .map(|day| {
            let mut income = Decimal::ZERO;
            let mut expense = Decimal::ZERO;
            for tx in transactions.iter().filter(|t| t.date == day) {
                match tx.r#type {
                    TransactionType::Income => income += tx.amount,
                    TransactionType::Expense => expense += tx.amount,
                    TransactionType::Transfer => {}
                }
            }
            balance += income - expense;
            DailyPoint {
                date: day,
                income,
                expense,
                balance,
            }
        })
        .collect()
}
