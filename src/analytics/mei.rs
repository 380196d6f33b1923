// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly closing for MEI bookkeeping: revenue, costs by category, the tax
//! reserve set aside from revenue, profit and margin.

use crate::analytics::classifier::category_display_name;
use crate::models::{Transaction, TransactionType, YearMonth};
use rust_decimal::Decimal;
use serde::Serialize;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

pub const TOTAL_ROW_LABEL: &str = "Total";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenueSummary {
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostCategory {
    pub category: String,
    pub display_name: String,
    pub count: usize,
    pub amount: Decimal,
    /// Share of total costs, 0..=100.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostSummary {
    pub total: Decimal,
    pub by_category: Vec<CostCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeiMonthlyReport {
    pub period: YearMonth,
    pub revenue: RevenueSummary,
    pub costs: CostSummary,
    pub tax_reserve: Decimal,
    pub tax_percentage: Decimal,
    pub profit: Decimal,
    pub margin: Decimal,
}

impl MeiMonthlyReport {
    /// Synthetic row summing every category row.
    pub fn total_row(&self) -> CostCategory {
        let amount = self
            .costs
            .by_category
            .iter()
            .fold(Decimal::ZERO, |acc, c| acc.saturating_add(c.amount));
        CostCategory {
            category: TOTAL_ROW_LABEL.to_string(),
            display_name: TOTAL_ROW_LABEL.to_string(),
            count: self.costs.by_category.iter().map(|c| c.count).sum(),
            amount,
            percentage: if self.costs.by_category.is_empty() {
                Decimal::ZERO
            } else {
                HUNDRED
            },
        }
    }

    /// Category rows followed by the total row, ready for a table.
    pub fn table_rows(&self) -> Vec<CostCategory> {
        let mut rows = self.costs.by_category.clone();
        rows.push(self.total_row());
        rows
    }
}

/// `part / whole * 100`, or 0 when `whole` is zero or the ratio does not fit
/// in a `Decimal`.
pub(crate) fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

pub fn generate_monthly_closing(
    transactions: &[Transaction],
    year: i32,
    month: u32,
    tax_percentage: Decimal,
    use_competence_date: bool,
) -> MeiMonthlyReport {
    let period = YearMonth { year, month };
    let in_month: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| period.contains(t.accounting_date(use_competence_date)))
        .collect();

    let mut revenue = RevenueSummary {
        total: Decimal::ZERO,
        count: 0,
    };
    let mut by_category: Vec<CostCategory> = Vec::new();
    for tx in &in_month {
        match tx.r#type {
            TransactionType::Income => {
                revenue.total = revenue.total.saturating_add(tx.amount);
                revenue.count += 1;
            }
            TransactionType::Expense => {
                match by_category.iter_mut().find(|c| c.category == tx.category) {
                    Some(row) => {
                        row.amount = row.amount.saturating_add(tx.amount);
                        row.count += 1;
                    }
                    None => by_category.push(CostCategory {
                        category: tx.category.clone(),
                        display_name: category_display_name(&tx.category),
                        count: 1,
                        amount: tx.amount,
                        percentage: Decimal::ZERO,
                    }),
                }
            }
            TransactionType::Transfer => {}
        }
    }

    let costs_total = by_category
        .iter()
        .fold(Decimal::ZERO, |acc, c| acc.saturating_add(c.amount));
    for row in by_category.iter_mut() {
        row.percentage = percentage_of(row.amount, costs_total);
    }
    by_category.sort_by(|a, b| a.category.cmp(&b.category));

    let tax_reserve = revenue
        .total
        .checked_mul(tax_percentage)
        .map(|v| v / HUNDRED)
        .unwrap_or_else(|| (revenue.total / HUNDRED).saturating_mul(tax_percentage));
    let profit = revenue
        .total
        .saturating_sub(costs_total)
        .saturating_sub(tax_reserve);
    let margin = percentage_of(profit, revenue.total);

    MeiMonthlyReport {
        period,
        revenue,
        costs: CostSummary {
            total: costs_total,
            by_category,
        },
        tax_reserve,
        tax_percentage,
        profit,
        margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tx(id: i64, date: &str, kind: TransactionType, amount: i64, cat: &str) -> Transaction {
        Transaction::new(id, d(date), kind, Decimal::from(amount), cat)
    }

    fn march() -> Vec<Transaction> {
        vec![
            tx(1, "2024-03-01", TransactionType::Income, 5000, "salario"),
            tx(2, "2024-03-05", TransactionType::Expense, 300, "moradia"),
            tx(3, "2024-03-10", TransactionType::Expense, 150, "lazer"),
        ]
    }

    #[test]
    fn closing_matches_reference_month() {
        let r = generate_monthly_closing(&march(), 2024, 3, Decimal::from(6), false);
        assert_eq!(r.revenue.total, Decimal::from(5000));
        assert_eq!(r.revenue.count, 1);
        assert_eq!(r.costs.total, Decimal::from(450));
        assert_eq!(r.tax_reserve, Decimal::from(300));
        assert_eq!(r.profit, Decimal::from(4250));
        assert_eq!(r.margin, Decimal::from(85));
        assert_eq!(r.period.to_string(), "2024-03");
    }

    #[test]
    fn empty_month_is_all_zero() {
        let r = generate_monthly_closing(&[], 2024, 3, Decimal::from(6), false);
        assert!(r.revenue.total.is_zero());
        assert!(r.costs.total.is_zero());
        assert!(r.tax_reserve.is_zero());
        assert!(r.profit.is_zero());
        assert!(r.margin.is_zero());
        assert!(r.costs.by_category.is_empty());
        assert!(r.total_row().percentage.is_zero());
    }

    #[test]
    fn costs_without_revenue_keep_margin_at_zero() {
        let txs = vec![tx(1, "2024-03-05", TransactionType::Expense, 90, "moradia")];
        let r = generate_monthly_closing(&txs, 2024, 3, Decimal::from(6), false);
        assert_eq!(r.profit, Decimal::from(-90));
        assert!(r.margin.is_zero());
        assert_eq!(r.costs.by_category[0].percentage, Decimal::from(100));
    }

    #[test]
    fn rows_sorted_by_name_and_total_row_matches() {
        let mut txs = march();
        txs.push(tx(4, "2024-03-11", TransactionType::Expense, 7, "assinaturas"));
        txs.push(tx(5, "2024-03-12", TransactionType::Expense, 3, "lazer"));
        let r = generate_monthly_closing(&txs, 2024, 3, Decimal::from(6), false);
        let names: Vec<&str> = r.costs.by_category.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["assinaturas", "lazer", "moradia"]);
        let lazer = &r.costs.by_category[1];
        assert_eq!((lazer.count, lazer.amount), (2, Decimal::from(153)));

        let rows = r.table_rows();
        let total = rows.last().unwrap();
        assert_eq!(total.category, TOTAL_ROW_LABEL);
        assert_eq!(total.amount, r.costs.total);
        assert_eq!(total.count, 4);
        let pct_sum: Decimal = r.costs.by_category.iter().map(|c| c.percentage).sum();
        assert_eq!(pct_sum.round_dp(10), Decimal::from(100));
    }

    #[test]
    fn competence_toggle_moves_transactions_between_months() {
        let mut late = tx(1, "2024-04-02", TransactionType::Income, 1000, "vendas");
        late.competence_date = Some(d("2024-03-30"));
        let txs = vec![late];
        let by_payment = generate_monthly_closing(&txs, 2024, 3, Decimal::ZERO, false);
        let by_competence = generate_monthly_closing(&txs, 2024, 3, Decimal::ZERO, true);
        assert!(by_payment.revenue.total.is_zero());
        assert_eq!(by_competence.revenue.total, Decimal::from(1000));
    }

    #[test]
    fn transfers_are_ignored_and_output_is_idempotent() {
        let mut txs = march();
        txs.push(tx(9, "2024-03-20", TransactionType::Transfer, 800, "reserva"));
        let a = generate_monthly_closing(&txs, 2024, 3, Decimal::new(65, 1), false);
        let b = generate_monthly_closing(&txs, 2024, 3, Decimal::new(65, 1), false);
        assert_eq!(a, b);
        assert_eq!(a.costs.total, Decimal::from(450));
        assert_eq!(a.tax_reserve, Decimal::from(325));
    }

    #[test]
    fn extreme_ratios_fall_back_instead_of_panicking() {
        let txs = vec![
            Transaction::new(
                1,
                d("2024-03-01"),
                TransactionType::Income,
                Decimal::new(1, 10),
                "vendas",
            ),
            Transaction::new(
                2,
                d("2024-03-02"),
                TransactionType::Expense,
                Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0),
                "fornecedores",
            ),
        ];
        let r = generate_monthly_closing(&txs, 2024, 3, Decimal::from(6), false);
        assert!(r.margin.is_zero());
        assert!(r.profit.is_sign_negative());
        assert_eq!(r.total_row().amount, r.costs.total);

        let huge = vec![Transaction::new(
            1,
            d("2024-03-01"),
            TransactionType::Income,
            Decimal::MAX,
            "vendas",
        )];
        let r = generate_monthly_closing(&huge, 2024, 3, Decimal::from(50), false);
        assert_eq!(r.revenue.total, Decimal::MAX);
        assert!(r.tax_reserve > Decimal::ZERO && r.tax_reserve < Decimal::MAX);
        assert_eq!(r.margin.round_dp(0), Decimal::from(50));
    }
}
