// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure aggregation over already-loaded transactions and bills. Nothing here
//! touches the database.

pub mod annual;
pub mod bills;
pub mod classifier;
pub mod daily;
pub mod mei;
pub mod monthly;
pub mod period;
pub mod recurring;
pub mod weekly;

pub use annual::{AnnualLimitStatus, annual_limit_status};
pub use bills::{BillDraft, BillMetrics, build_installments, compute_bill_metrics};
pub use classifier::{CategoryBucket, category_display_name, classify, is_known_category};
pub use daily::{DailyPoint, daily_series};
pub use mei::{MeiMonthlyReport, generate_monthly_closing};
pub use monthly::{CategoryTotal, MonthData, YearSummary, aggregate_year};
pub use period::{Dated, PeriodFilter, filter_by_period};
pub use recurring::upcoming_recurring;
pub use weekly::{WeeklySpending, compute_weekly_insight};
