// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TransactionType};
use crate::repository::{FinanceStore, SqliteStore};
use crate::utils::{apply_category_rules, parse_amount, parse_date};
use anyhow::{Context, Result, anyhow, bail};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::path::Path;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let n = import_transactions(conn, path)?;
            println!("Imported {} transactions from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Reads `date,type,amount,category,description,competence_date` rows, with
/// optional trailing `is_recurring,next_due_date` columns as written by the
/// exporter. The whole file goes in one SQLite transaction: a bad row rolls
/// everything back.
pub fn import_transactions(conn: &mut Connection, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))?;

    let tx = conn.transaction()?;
    let mut count = 0usize;
    {
        let store = SqliteStore::new(&tx);
        for (i, result) in rdr.records().enumerate() {
            // header is line 1
            let line = i + 2;
            let rec = result?;
            let field = |idx: usize| rec.get(idx).map(str::trim).unwrap_or("");

            let date = parse_date(field(0)).with_context(|| format!("line {}", line))?;
            let kind = field(1)
                .parse::<TransactionType>()
                .with_context(|| format!("line {}", line))?;
            let amount = parse_amount(field(2)).with_context(|| format!("line {}", line))?;
            let description = field(4).to_string();
            let category = if field(3).is_empty() {
                apply_category_rules(&tx, &description)?.ok_or_else(|| {
                    anyhow!("line {}: no category and no rule matches '{}'", line, description)
                })?
            } else {
                field(3).to_string()
            };
            let competence_date = match field(5) {
                "" => None,
                raw => Some(parse_date(raw).with_context(|| format!("line {}", line))?),
            };

            let next_due_date = match field(7) {
                "" => None,
                raw => Some(parse_date(raw).with_context(|| format!("line {}", line))?),
            };
            let is_recurring = match field(6).to_ascii_lowercase().as_str() {
                "" => next_due_date.is_some(),
                "false" | "0" => false,
                "true" | "1" => true,
                other => {
                    bail!("line {}: is_recurring must be true or false, not '{}'", line, other)
                }
            };

            store.insert_transaction(&Transaction {
                id: 0,
                date,
                amount,
                r#type: kind,
                category,
                description,
                is_recurring,
                next_due_date,
                competence_date,
            })?;
            count += 1;
        }
    }
    tx.commit()?;
    tracing::info!(count, path = %path.display(), "transactions imported");
    Ok(count)
}
