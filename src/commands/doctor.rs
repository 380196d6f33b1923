// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::is_known_category;
use crate::repository::{FinanceStore, SqliteStore};
use crate::utils::pretty_table;
use anyhow::Result;
use regex::Regex;
use rusqlite::Connection;
use std::collections::BTreeMap;

/// Collects `[issue, detail]` rows; an empty result means the data is clean.
pub fn find_issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let store = SqliteStore::new(conn);
    let mut rows = Vec::new();

    for bill in store.load_bills()? {
        if let Err(err) = bill.validate() {
            rows.push(vec!["invalid_bill".into(), err.to_string()]);
        }
    }

    let mut unknown: BTreeMap<String, usize> = BTreeMap::new();
    for tx in store.load_transactions()? {
        if tx.amount.is_sign_negative() && !tx.amount.is_zero() {
            rows.push(vec![
                "negative_amount".into(),
                format!("transaction {} ({})", tx.id, tx.amount),
            ]);
        }
        if !is_known_category(&tx.category) {
            *unknown.entry(tx.category.trim().to_string()).or_default() += 1;
        }
    }
    for (label, n) in unknown {
        rows.push(vec![
            "unknown_category".into(),
            format!("'{}' used by {} transaction(s)", label, n),
        ]);
    }

    let mut stmt = conn.prepare("SELECT id, pattern FROM rules ORDER BY id")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let pat: String = r.get(1)?;
        if Regex::new(&pat).is_err() {
            rows.push(vec!["invalid_rule".into(), format!("rule {} /{}/", id, pat)]);
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = find_issues(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        tracing::warn!(count = rows.len(), "doctor found issues");
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
