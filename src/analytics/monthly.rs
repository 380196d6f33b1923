// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::classifier::{CategoryBucket, category_display_name, classify};
use crate::models::{Transaction, TransactionType};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub display_name: String,
    pub amount: Decimal,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthData {
    /// Zero-based: 0 = January.
    pub month: u32,
    pub revenue: Vec<CategoryTotal>,
    pub essential_expenses: Vec<CategoryTotal>,
    pub non_essential_expenses: Vec<CategoryTotal>,
    pub reserves: Vec<CategoryTotal>,
    pub total_revenue: Decimal,
    pub total_essential_expenses: Decimal,
    pub total_non_essential_expenses: Decimal,
    pub total_reserves: Decimal,
    pub monthly_surplus: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub months: Vec<MonthData>,
}

impl YearSummary {
    pub fn total_revenue(&self) -> Decimal {
        self.months.iter().map(|m| m.total_revenue).sum()
    }

    pub fn total_surplus(&self) -> Decimal {
        self.months.iter().map(|m| m.monthly_surplus).sum()
    }
}

struct Group {
    kind: TransactionType,
    total: CategoryTotal,
}

fn sum(groups: &[CategoryTotal]) -> Decimal {
    groups.iter().map(|g| g.amount).sum()
}

fn aggregate_month(transactions: &[Transaction], year: i32, month0: u32) -> MonthData {
    // Groups keep first-seen order.
    let mut groups: Vec<Group> = Vec::new();
    for tx in transactions
        .iter()
        .filter(|t| t.date.year() == year && t.date.month0() == month0)
    {
        match groups
            .iter_mut()
            .find(|g| g.kind == tx.r#type && g.total.category == tx.category)
        {
            Some(group) => {
                group.total.amount += tx.amount;
                group.total.transactions.push(tx.clone());
            }
            None => groups.push(Group {
                kind: tx.r#type,
                total: CategoryTotal {
                    category: tx.category.clone(),
                    display_name: category_display_name(&tx.category),
                    amount: tx.amount,
                    transactions: vec![tx.clone()],
                },
            }),
        }
    }

    let mut revenue = Vec::new();
    let mut essential = Vec::new();
    let mut non_essential = Vec::new();
    let mut reserves = Vec::new();
    for group in groups {
        if group.kind == TransactionType::Income {
            revenue.push(group.total);
            continue;
        }
        match classify(&group.total.category) {
            CategoryBucket::Essential => essential.push(group.total),
            CategoryBucket::NonEssential => non_essential.push(group.total),
            CategoryBucket::Reserve => reserves.push(group.total),
        }
    }

    let total_revenue = sum(&revenue);
    let total_essential_expenses = sum(&essential);
    let total_non_essential_expenses = sum(&non_essential);
    let total_reserves = sum(&reserves);
    MonthData {
        month: month0,
        revenue,
        essential_expenses: essential,
        non_essential_expenses: non_essential,
        reserves,
        total_revenue,
        total_essential_expenses,
        total_non_essential_expenses,
        total_reserves,
        monthly_surplus: total_revenue
            - total_essential_expenses
            - total_non_essential_expenses
            - total_reserves,
    }
}

/// Builds the twelve month buckets for `year`; transactions from other years
/// are ignored.
pub fn aggregate_year(transactions: &[Transaction], year: i32) -> YearSummary {
    let months = (0..12)
        .map(|m| aggregate_month(transactions, year, m))
        .collect();
    YearSummary { year, months }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(id: i64, date: &str, kind: TransactionType, amount: i64, cat: &str) -> Transaction {
        Transaction::new(
            id,
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            kind,
            Decimal::from(amount),
            cat,
        )
    }

    #[test]
    fn months_are_emitted_in_calendar_order() {
        let txs = vec![
            tx(1, "2024-12-05", TransactionType::Income, 10, "vendas"),
            tx(2, "2024-01-05", TransactionType::Income, 20, "vendas"),
        ];
        let summary = aggregate_year(&txs, 2024);
        assert_eq!(summary.months.len(), 12);
        for (i, m) in summary.months.iter().enumerate() {
            assert_eq!(m.month as usize, i);
        }
        assert_eq!(summary.months[0].total_revenue, Decimal::from(20));
        assert_eq!(summary.months[11].total_revenue, Decimal::from(10));
    }

    #[test]
    fn groups_by_type_and_category_in_first_seen_order() {
        let txs = vec![
            tx(1, "2024-03-01", TransactionType::Expense, 100, "lazer"),
            tx(2, "2024-03-02", TransactionType::Expense, 300, "moradia"),
            tx(3, "2024-03-03", TransactionType::Expense, 50, "lazer"),
            tx(4, "2024-03-04", TransactionType::Expense, 40, "compras"),
            tx(5, "2024-03-05", TransactionType::Transfer, 200, "investimento"),
            tx(6, "2024-03-06", TransactionType::Income, 1000, "salario"),
        ];
        let march = &aggregate_year(&txs, 2024).months[2];
        let non_ess: Vec<_> = march
            .non_essential_expenses
            .iter()
            .map(|c| (c.category.as_str(), c.amount))
            .collect();
        assert_eq!(
            non_ess,
            vec![("lazer", Decimal::from(150)), ("compras", Decimal::from(40))]
        );
        assert_eq!(march.non_essential_expenses[0].transactions.len(), 2);
        assert_eq!(march.essential_expenses[0].display_name, "Moradia");
        assert_eq!(march.reserves[0].amount, Decimal::from(200));
        assert_eq!(march.revenue[0].display_name, "Salário");
        assert_eq!(march.monthly_surplus, Decimal::from(1000 - 300 - 190 - 200));
    }

    #[test]
    fn income_and_expense_with_same_label_stay_apart() {
        let txs = vec![
            tx(1, "2024-05-01", TransactionType::Income, 70, "outros"),
            tx(2, "2024-05-02", TransactionType::Expense, 30, "outros"),
        ];
        let may = &aggregate_year(&txs, 2024).months[4];
        assert_eq!(may.total_revenue, Decimal::from(70));
        assert_eq!(may.total_non_essential_expenses, Decimal::from(30));
    }

    #[test]
    fn other_years_do_not_leak_into_the_requested_year() {
        let txs = vec![
            tx(1, "2023-06-10", TransactionType::Expense, 999, "moradia"),
            tx(2, "2024-06-10", TransactionType::Expense, 1, "moradia"),
        ];
        let june = &aggregate_year(&txs, 2024).months[5];
        assert_eq!(june.total_essential_expenses, Decimal::ONE);
    }

    #[test]
    fn bucket_totals_cover_every_matching_transaction() {
        let txs = vec![
            tx(1, "2024-01-03", TransactionType::Income, 5000, "salario"),
            tx(2, "2024-02-05", TransactionType::Expense, 300, "moradia"),
            tx(3, "2024-02-10", TransactionType::Expense, 150, "lazer"),
            tx(4, "2024-07-10", TransactionType::Transfer, 500, "reserva"),
            tx(5, "2024-07-11", TransactionType::Expense, 80, "sem rotulo"),
            tx(6, "2025-01-01", TransactionType::Income, 77, "salario"),
        ];
        let summary = aggregate_year(&txs, 2024);
        let bucketed: Decimal = summary
            .months
            .iter()
            .map(|m| {
                m.total_revenue
                    + m.total_essential_expenses
                    + m.total_non_essential_expenses
                    + m.total_reserves
            })
            .sum();
        assert_eq!(bucketed, Decimal::from(5000 + 300 + 150 + 500 + 80));
        assert_eq!(summary.total_revenue(), Decimal::from(5000));
        assert_eq!(summary.total_surplus(), Decimal::from(5000 - 300 - 150 - 500 - 80));
    }

    #[test]
    fn empty_input_yields_twelve_zero_months() {
        let summary = aggregate_year(&[], 2024);
        assert!(summary.months.iter().all(|m| m.monthly_surplus.is_zero()
            && m.revenue.is_empty()
            && m.reserves.is_empty()));
    }
}
