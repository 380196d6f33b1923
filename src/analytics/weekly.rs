// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TransactionType};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

pub const DAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySpending {
    pub day: &'static str,
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendingInsight {
    pub highest_spending_day: &'static str,
    pub highest_average: Decimal,
    pub lowest_spending_day: &'static str,
    pub lowest_average: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklySpending {
    pub per_day: Vec<DaySpending>,
    pub insight: Option<SpendingInsight>,
}

/// Monday = 0 .. Sunday = 6.
pub fn day_index(date: NaiveDate) -> usize {
    let native = date.weekday().num_days_from_sunday() as i32;
    let idx = native - 1;
    if idx == -1 { 6 } else { idx as usize }
}

pub fn compute_weekly_insight(transactions: &[Transaction]) -> WeeklySpending {
    let mut totals = [Decimal::ZERO; 7];
    let mut counts = [0usize; 7];
    for tx in transactions
        .iter()
        .filter(|t| t.r#type == TransactionType::Expense)
    {
        let i = day_index(tx.date);
        totals[i] += tx.amount;
        counts[i] += 1;
    }

    let per_day: Vec<DaySpending> = (0..7)
        .map(|i| DaySpending {
            day: DAY_LABELS[i],
            total: totals[i],
            count: counts[i],
            average: if counts[i] == 0 {
                Decimal::ZERO
            } else {
                totals[i] / Decimal::from(counts[i])
            },
        })
        .collect();

    let mut highest: Option<&DaySpending> = None;
    let mut lowest: Option<&DaySpending> = None;
    // Days without transactions are not candidates.
    for day in per_day.iter().filter(|d| d.count > 0) {
        if highest.is_none_or(|h| day.average > h.average) {
            highest = Some(day);
        }
        if lowest.is_none_or(|l| day.average < l.average) {
            lowest = Some(day);
        }
    }
    let insight = match (highest, lowest) {
        (Some(h), Some(l)) => Some(SpendingInsight {
            highest_spending_day: h.day,
            highest_average: h.average,
            lowest_spending_day: l.day,
            lowest_average: l.average,
        }),
        _ => None,
    };

    WeeklySpending { per_day, insight }
}
