// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{filter_by_period, upcoming_recurring};
use crate::config::Settings;
use crate::models::{Transaction, TransactionType};
use crate::repository::{FinanceStore, SqliteStore, with_retry};
use crate::utils::{
    apply_category_rules, fmt_money, maybe_print_json, parse_amount, parse_date, parse_period,
    pretty_table, today,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("upcoming", sub)) => upcoming(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Loads every transaction through the configured retry policy.
pub fn load_all(conn: &Connection) -> Result<Vec<Transaction>> {
    let settings = Settings::load(conn)?;
    let store = SqliteStore::new(conn);
    with_retry(settings.retry, "load transactions", || store.load_transactions())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let kind = sub.get_one::<String>("type").unwrap().parse::<TransactionType>()?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let explicit = sub
        .get_one::<String>("category")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());
    let category = match explicit {
        Some(c) => c,
        None => apply_category_rules(conn, &description)?
            .ok_or_else(|| anyhow!("No --category given and no rule matches '{}'", description))?,
    };
    let competence_date = match sub.get_one::<String>("competence_date") {
        Some(raw) => Some(parse_date(raw)?),
        None => None,
    };
    let next_due_date = match sub.get_one::<String>("next_due") {
        Some(raw) => Some(parse_date(raw)?),
        None => None,
    };
    let is_recurring = sub.get_flag("recurring") || next_due_date.is_some();

    let tx = Transaction {
        id: 0,
        date,
        amount,
        r#type: kind,
        category,
        description,
        is_recurring,
        next_due_date,
        competence_date,
    };
    let id = SqliteStore::new(conn).insert_transaction(&tx)?;
    tracing::info!(id, kind = %tx.r#type, "transaction recorded");
    println!(
        "Recorded {} {} on {} ({}) as #{}",
        tx.r#type,
        fmt_money(&tx.amount),
        tx.date,
        tx.category,
        id
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub r#type: String,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub recurring: bool,
    pub next_due_date: String,
    pub competence_date: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        Self {
            id: t.id,
            date: t.date.to_string(),
            r#type: t.r#type.to_string(),
            amount: t.amount.to_string(),
            category: t.category.clone(),
            description: t.description.clone(),
            recurring: t.is_recurring,
            next_due_date: t.next_due_date.map(|d| d.to_string()).unwrap_or_default(),
            competence_date: t.competence_date.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let filter = parse_period(sub)?;
    let kind = match sub.get_one::<String>("type") {
        Some(raw) => Some(raw.parse::<TransactionType>()?),
        None => None,
    };
    let category = sub.get_one::<String>("category").map(|s| s.trim().to_lowercase());

    let mut txs = filter_by_period(&load_all(conn)?, filter, today());
    txs.retain(|t| kind.is_none_or(|k| t.r#type == k));
    if let Some(ref c) = category {
        txs.retain(|t| t.category.trim().to_lowercase() == *c);
    }
    txs.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txs.truncate(*limit);
    }
    Ok(txs.iter().map(TransactionRow::from).collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.r#type.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    if r.recurring { "yes".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Amount", "Category", "Description", "Recurring"],
                rows,
            )
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let raw = sub.get_one::<String>("id").unwrap();
    let id = raw.trim().parse::<i64>()?;
    if !SqliteStore::new(conn).delete_transaction(id)? {
        return Err(anyhow!("Transaction {} not found", id));
    }
    tracing::info!(id, "transaction deleted");
    println!("Removed transaction {}", id);
    Ok(())
}

fn upcoming(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let days = *sub.get_one::<u64>("days").unwrap_or(&30);
    let due = upcoming_recurring(&load_all(conn)?, today(), days);
    let data: Vec<TransactionRow> = due.iter().map(TransactionRow::from).collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|r| vec![r.next_due_date, r.r#type, r.amount, r.category, r.description])
            .collect();
        println!(
            "{}",
            pretty_table(&["Due", "Type", "Amount", "Category", "Description"], rows)
        );
    }
    Ok(())
}
