// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::FinanceError;
use crate::models::{Bill, Transaction, YearMonth};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Records that can be placed on the calendar.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for Transaction {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for Bill {
    fn date(&self) -> NaiveDate {
        self.due_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodFilter {
    Today,
    ThisWeek,
    ThisMonth,
    CustomMonth(Option<YearMonth>),
    Always,
}

impl PeriodFilter {
    /// Parses a period name plus the optional `YYYY-MM` used by `custom-month`.
    pub fn parse(name: &str, custom_month: Option<&str>) -> Result<Self, FinanceError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(PeriodFilter::Today),
            "this-week" => Ok(PeriodFilter::ThisWeek),
            "this-month" => Ok(PeriodFilter::ThisMonth),
            "custom-month" => {
                let month = match custom_month.map(str::trim).filter(|s| !s.is_empty()) {
                    Some(raw) => Some(raw.parse::<YearMonth>()?),
                    None => None,
                };
                Ok(PeriodFilter::CustomMonth(month))
            }
            "always" | "all" => Ok(PeriodFilter::Always),
            other => Err(FinanceError::InvalidPeriod(other.to_string())),
        }
    }

    /// Inclusive date range, or `None` when the filter does not restrict dates.
    pub fn range(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            PeriodFilter::Today => Some((today, today)),
            PeriodFilter::ThisWeek => {
                let offset = u64::from(today.weekday().num_days_from_sunday());
                let start = today.checked_sub_days(Days::new(offset))?;
                let end = start.checked_add_days(Days::new(6))?;
                Some((start, end))
            }
            PeriodFilter::ThisMonth => {
                let ym = YearMonth::of(today);
                Some((ym.first_day(), ym.last_day()))
            }
            PeriodFilter::CustomMonth(Some(ym)) => Some((ym.first_day(), ym.last_day())),
            PeriodFilter::CustomMonth(None) | PeriodFilter::Always => None,
        }
    }
}

impl fmt::Display for PeriodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodFilter::Today => f.write_str("today"),
            PeriodFilter::ThisWeek => f.write_str("this-week"),
            PeriodFilter::ThisMonth => f.write_str("this-month"),
            PeriodFilter::CustomMonth(Some(ym)) => write!(f, "custom-month {}", ym),
            PeriodFilter::CustomMonth(None) => f.write_str("custom-month"),
            PeriodFilter::Always => f.write_str("always"),
        }
    }
}

pub fn filter_by_period<T: Dated + Clone>(
    records: &[T],
    filter: PeriodFilter,
    today: NaiveDate,
) -> Vec<T> {
    match filter.range(today) {
        Some((start, end)) => records
            .iter()
            .filter(|r| {
                let d = r.date();
                d >= start && d <= end
            })
            .cloned()
            .collect(),
        None => {
            if filter == PeriodFilter::CustomMonth(None) {
                tracing::debug!("custom-month filter without a month; keeping all records");
            }
            records.to_vec()
        }
    }
}
