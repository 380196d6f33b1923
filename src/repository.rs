// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Storage seam for transactions and bills. Commands build a [`SqliteStore`]
//! over the connection they are given; the analytics layer only ever sees the
//! loaded vectors.

use crate::config::RetryPolicy;
use crate::models::{Bill, Transaction, TransactionType};
use crate::utils::{parse_date, parse_decimal};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, params};

pub trait FinanceStore {
    fn load_transactions(&self) -> Result<Vec<Transaction>>;
    fn insert_transaction(&self, tx: &Transaction) -> Result<i64>;
    fn delete_transaction(&self, id: i64) -> Result<bool>;
    fn load_bills(&self) -> Result<Vec<Bill>>;
    fn insert_bill(&self, bill: &Bill) -> Result<i64>;
    fn mark_bill_paid(&self, id: i64, paid_date: NaiveDate) -> Result<bool>;
    fn delete_bill(&self, id: i64) -> Result<bool>;
}

/// Runs `op` up to `policy.max_attempts` times, sleeping `policy.delay_ms`
/// between failed attempts. The last error is returned.
pub fn with_retry<T>(
    policy: RetryPolicy,
    what: &str,
    mut op: impl FnMut() -> Result<T>,
) -> Result<T> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(err) if attempt < attempts => {
                tracing::warn!(attempt, attempts, error = %err, "{} failed, retrying", what);
                std::thread::sleep(policy.delay());
                attempt += 1;
            }
            Err(err) => {
                return Err(err.context(format!("{} failed after {} attempt(s)", what, attempts)));
            }
        }
    }
}

pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

fn opt_date(raw: Option<String>) -> Result<Option<NaiveDate>> {
    match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Ok(Some(parse_date(s)?)),
        None => Ok(None),
    }
}

struct TransactionRow {
    id: i64,
    date: String,
    amount: String,
    kind: String,
    category: String,
    description: String,
    is_recurring: bool,
    next_due_date: Option<String>,
    competence_date: Option<String>,
}

impl TransactionRow {
    fn into_transaction(self) -> Result<Transaction> {
        let id = self.id;
        Ok(Transaction {
            id,
            date: parse_date(&self.date).with_context(|| format!("transaction {}", id))?,
            amount: parse_decimal(&self.amount).with_context(|| format!("transaction {}", id))?,
            r#type: self
                .kind
                .parse::<TransactionType>()
                .with_context(|| format!("transaction {}", id))?,
            category: self.category,
            description: self.description,
            is_recurring: self.is_recurring,
            next_due_date: opt_date(self.next_due_date)?,
            competence_date: opt_date(self.competence_date)?,
        })
    }
}

struct BillRow {
    id: i64,
    title: String,
    description: String,
    amount: String,
    due_date: String,
    is_paid: bool,
    paid_date: Option<String>,
    installment_index: u32,
    installment_total: u32,
    series_id: Option<String>,
}

impl BillRow {
    fn into_bill(self) -> Result<Bill> {
        let id = self.id;
        Ok(Bill {
            id,
            title: self.title,
            description: self.description,
            amount: parse_decimal(&self.amount).with_context(|| format!("bill {}", id))?,
            due_date: parse_date(&self.due_date).with_context(|| format!("bill {}", id))?,
            is_paid: self.is_paid,
            paid_date: opt_date(self.paid_date)?,
            installment_index: self.installment_index,
            installment_total: self.installment_total,
            series_id: self.series_id,
        })
    }
}

impl FinanceStore for SqliteStore<'_> {
    fn load_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, amount, type, category, description,
                    is_recurring, next_due_date, competence_date
             FROM transactions ORDER BY date, id",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(TransactionRow {
                id: r.get(0)?,
                date: r.get(1)?,
                amount: r.get(2)?,
                kind: r.get(3)?,
                category: r.get(4)?,
                description: r.get(5)?,
                is_recurring: r.get(6)?,
                next_due_date: r.get(7)?,
                competence_date: r.get(8)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_transaction()?);
        }
        tracing::debug!(count = out.len(), "transactions loaded");
        Ok(out)
    }

    fn insert_transaction(&self, tx: &Transaction) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO transactions(date, amount, type, category, description,
                                      is_recurring, next_due_date, competence_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                tx.date.to_string(),
                tx.amount.to_string(),
                tx.r#type.as_str(),
                tx.category,
                tx.description,
                tx.is_recurring,
                tx.next_due_date.map(|d| d.to_string()),
                tx.competence_date.map(|d| d.to_string()),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn delete_transaction(&self, id: i64) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        Ok(n > 0)
    }

    fn load_bills(&self) -> Result<Vec<Bill>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, amount, due_date, is_paid, paid_date,
                    installment_index, installment_total, series_id
             FROM bills ORDER BY due_date, id",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(BillRow {
                id: r.get(0)?,
                title: r.get(1)?,
                description: r.get(2)?,
                amount: r.get(3)?,
                due_date: r.get(4)?,
                is_paid: r.get(5)?,
                paid_date: r.get(6)?,
                installment_index: r.get(7)?,
                installment_total: r.get(8)?,
                series_id: r.get(9)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_bill()?);
        }
        tracing::debug!(count = out.len(), "bills loaded");
        Ok(out)
    }

    fn insert_bill(&self, bill: &Bill) -> Result<i64> {
        bill.validate()?;
        self.conn.execute(
            "INSERT INTO bills(title, description, amount, due_date, is_paid, paid_date,
                               installment_index, installment_total, series_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                bill.title,
                bill.description,
                bill.amount.to_string(),
                bill.due_date.to_string(),
                bill.is_paid,
                bill.paid_date.map(|d| d.to_string()),
                bill.installment_index,
                bill.installment_total,
                bill.series_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn mark_bill_paid(&self, id: i64, paid_date: NaiveDate) -> Result<bool> {
        let n = self.conn.execute(
            "UPDATE bills SET is_paid=1, paid_date=?2 WHERE id=?1",
            params![id, paid_date.to_string()],
        )?;
        Ok(n > 0)
    }

    fn delete_bill(&self, id: i64) -> Result<bool> {
        let n = self.conn.execute("DELETE FROM bills WHERE id=?1", params![id])?;
        Ok(n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use rust_decimal::Decimal;
    use std::cell::Cell;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn transactions_round_trip_through_sqlite() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&mut conn).unwrap();
        let store = SqliteStore::new(&conn);
        let mut tx = Transaction::new(
            0,
            d("2024-03-05"),
            TransactionType::Expense,
            Decimal::new(1999, 2),
            "lazer",
        );
        tx.is_recurring = true;
        tx.next_due_date = Some(d("2024-04-05"));
        let id = store.insert_transaction(&tx).unwrap();
        let loaded = store.load_transactions().unwrap();
        assert_eq!(loaded, vec![Transaction { id, ..tx }]);
        assert!(store.delete_transaction(id).unwrap());
        assert!(!store.delete_transaction(id).unwrap());
    }

    #[test]
    fn paying_a_bill_sets_paid_date() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&mut conn).unwrap();
        let store = SqliteStore::new(&conn);
        let bill = Bill {
            id: 0,
            title: "Luz".into(),
            description: String::new(),
            amount: Decimal::from(120),
            due_date: d("2024-03-10"),
            is_paid: false,
            paid_date: None,
            installment_index: 1,
            installment_total: 1,
            series_id: None,
        };
        let id = store.insert_bill(&bill).unwrap();
        assert!(store.mark_bill_paid(id, d("2024-03-09")).unwrap());
        let loaded = store.load_bills().unwrap();
        assert!(loaded[0].is_paid);
        assert_eq!(loaded[0].paid_date, Some(d("2024-03-09")));
        assert!(!store.mark_bill_paid(id + 1, d("2024-03-09")).unwrap());
    }

    #[test]
    fn retry_stops_at_first_success() {
        let calls = Cell::new(0);
        let policy = RetryPolicy {
            max_attempts: 3,
            delay_ms: 0,
        };
        let v = with_retry(policy, "load", || {
            calls.set(calls.get() + 1);
            if calls.get() < 2 {
                anyhow::bail!("busy")
            }
            Ok(42)
        })
        .unwrap();
        assert_eq!(v, 42);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn retry_gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let policy = RetryPolicy {
            max_attempts: 2,
            delay_ms: 0,
        };
        let err = with_retry(policy, "load transactions", || -> Result<()> {
            calls.set(calls.get() + 1);
            anyhow::bail!("busy")
        })
        .unwrap_err();
        assert_eq!(calls.get(), 2);
        assert!(err.to_string().contains("after 2 attempt(s)"));
    }
}
