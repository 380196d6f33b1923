// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::period::{PeriodFilter, filter_by_period};
use crate::errors::FinanceError;
use crate::models::Bill;
use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BillMetrics {
    pub unpaid_bills_count: usize,
    pub paid_bills_count: usize,
    pub total_amount_to_pay: Decimal,
    pub total_amount_paid: Decimal,
}

pub fn compute_bill_metrics(bills: &[Bill], filter: PeriodFilter, today: NaiveDate) -> BillMetrics {
    filter_by_period(bills, filter, today)
        .iter()
        .fold(BillMetrics::default(), |mut m, bill| {
            if bill.is_paid {
                m.paid_bills_count += 1;
                m.total_amount_paid += bill.amount;
            } else {
                m.unpaid_bills_count += 1;
                m.total_amount_to_pay += bill.amount;
            }
            m
        })
}

/// A bill as entered by the user, before it is split into installments.
#[derive(Debug, Clone)]
pub struct BillDraft {
    pub title: String,
    pub description: String,
    pub amount: Decimal,
    pub first_due_date: NaiveDate,
}

/// Splits `draft` into `count` monthly installments sharing one series key.
/// Installments are truncated to cents; the last one absorbs the remainder,
/// so no installment is ever negative.
pub fn build_installments(draft: &BillDraft, count: u32) -> Result<Vec<Bill>, FinanceError> {
    if count == 0 {
        return Err(FinanceError::InvalidInstallmentCount(count));
    }
    if draft.amount.is_sign_negative() && !draft.amount.is_zero() {
        return Err(FinanceError::NegativeAmount(draft.amount));
    }
    let series_id = uuid::Uuid::new_v4().to_string();
    let share = (draft.amount / Decimal::from(count))
        .round_dp_with_strategy(2, RoundingStrategy::ToZero);
    let mut allotted = Decimal::ZERO;
    let mut out = Vec::with_capacity(count as usize);
    for i in 1..=count {
        let amount = if i == count {
            draft.amount - allotted
        } else {
            share
        };
        allotted += amount;
        // Month arithmetic clamps to the last valid day (Jan 31 -> Feb 29).
        let due_date = draft
            .first_due_date
            .checked_add_months(Months::new(i - 1))
            .unwrap_or(draft.first_due_date);
        let title = if count > 1 {
            format!("{} ({}/{})", draft.title, i, count)
        } else {
            draft.title.clone()
        };
        out.push(Bill {
            id: 0,
            title,
            description: draft.description.clone(),
            amount,
            due_date,
            is_paid: false,
            paid_date: None,
            installment_index: i,
            installment_total: count,
            series_id: Some(series_id.clone()),
        });
    }
    Ok(out)
}
