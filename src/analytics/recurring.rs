// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Transaction;
use chrono::{Days, NaiveDate};

/// Recurring transactions due within `[today, today + days]`, soonest first.
pub fn upcoming_recurring(
    transactions: &[Transaction],
    today: NaiveDate,
    days: u64,
) -> Vec<Transaction> {
    let horizon = today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
    let mut out: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.is_recurring)
        .filter(|t| matches!(t.next_due_date, Some(due) if due >= today && due <= horizon))
        .cloned()
        .collect();
    out.sort_by_key(|t| (t.next_due_date, t.id));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use rust_decimal::Decimal;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn recurring(id: i64, due: Option<&str>, flag: bool) -> Transaction {
        let mut t =
            Transaction::new(id, d("2024-01-01"), TransactionType::Expense, Decimal::TEN, "contas");
        t.is_recurring = flag;
        t.next_due_date = due.map(d);
        t
    }

    #[test]
    fn window_is_inclusive_and_sorted() {
        let txs = vec![
            recurring(1, Some("2024-03-20"), true),
            recurring(2, Some("2024-03-10"), true),
            recurring(3, Some("2024-03-09"), true),
            recurring(4, Some("2024-03-15"), false),
            recurring(5, None, true),
            recurring(6, Some("2024-03-21"), true),
        ];
        let out = upcoming_recurring(&txs, d("2024-03-10"), 10);
        let ids: Vec<i64> = out.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
