// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::FinanceError;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            "transfer" => Ok(TransactionType::Transfer),
            other => Err(FinanceError::InvalidTransactionType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal, // non-negative; direction comes from `type`
    pub r#type: TransactionType,
    pub category: String,
    pub description: String,
    pub is_recurring: bool,
    pub next_due_date: Option<NaiveDate>,
    pub competence_date: Option<NaiveDate>,
}

impl Transaction {
    pub fn new(
        id: i64,
        date: NaiveDate,
        r#type: TransactionType,
        amount: Decimal,
        category: &str,
    ) -> Self {
        Self {
            id,
            date,
            amount,
            r#type,
            category: category.to_string(),
            description: String::new(),
            is_recurring: false,
            next_due_date: None,
            competence_date: None,
        }
    }

    /// Date used to place the transaction in an accounting period.
    pub fn accounting_date(&self, use_competence_date: bool) -> NaiveDate {
        if use_competence_date {
            self.competence_date.unwrap_or(self.date)
        } else {
            self.date
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub is_paid: bool,
    pub paid_date: Option<NaiveDate>,
    pub installment_index: u32,
    pub installment_total: u32,
    pub series_id: Option<String>,
}

impl Bill {
    pub fn validate(&self) -> Result<(), FinanceError> {
        if self.is_paid && self.paid_date.is_none() {
            return Err(FinanceError::PaidWithoutDate(self.id));
        }
        if self.installment_index < 1 || self.installment_index > self.installment_total {
            return Err(FinanceError::InstallmentOutOfRange {
                id: self.id,
                index: self.installment_index,
                total: self.installment_total,
            });
        }
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(FinanceError::NegativeAmount(self.amount));
        }
        Ok(())
    }
}

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, FinanceError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(FinanceError::InvalidMonth(format!("{}-{:02}", year, month)));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let (y, m) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(y, m, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last_day();
        self.first_day().iter_days().take_while(move |d| *d <= last)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || FinanceError::InvalidMonth(raw.to_string());
        let (y, m) = raw.split_once('-').ok_or_else(invalid)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).map_err(|_| invalid())
    }
}
