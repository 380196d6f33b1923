// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{BillDraft, build_installments, compute_bill_metrics, filter_by_period};
use crate::config::Settings;
use crate::models::Bill;
use crate::repository::{FinanceStore, SqliteStore, with_retry};
use crate::utils::{
    fmt_money, maybe_print_json, parse_amount, parse_date, parse_period, pretty_table, today,
};
use anyhow::{Result, anyhow, bail};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("metrics", sub)) => metrics(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn load_all(conn: &Connection) -> Result<Vec<Bill>> {
    let settings = Settings::load(conn)?;
    let store = SqliteStore::new(conn);
    with_retry(settings.retry, "load bills", || store.load_bills())
}

fn parse_id(sub: &clap::ArgMatches) -> Result<i64> {
    let raw = sub.get_one::<String>("id").unwrap();
    raw.trim()
        .parse::<i64>()
        .map_err(|_| anyhow!("Invalid id '{}'", raw.trim()))
}

/// Inserts every installment inside one SQLite transaction and returns the
/// new row ids in order.
pub fn add_bill(conn: &Connection, draft: &BillDraft, installments: u32) -> Result<Vec<i64>> {
    let bills = build_installments(draft, installments)?;
    let tx = conn.unchecked_transaction()?;
    let mut ids = Vec::with_capacity(bills.len());
    {
        let store = SqliteStore::new(&tx);
        for bill in &bills {
            ids.push(store.insert_bill(bill)?);
        }
    }
    tx.commit()?;
    tracing::info!(count = ids.len(), title = %draft.title, "bill recorded");
    Ok(ids)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let title = sub.get_one::<String>("title").unwrap().trim().to_string();
    if title.is_empty() {
        bail!("Bill title must not be empty");
    }
    let draft = BillDraft {
        title,
        description: sub
            .get_one::<String>("description")
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        amount: parse_amount(sub.get_one::<String>("amount").unwrap())?,
        first_due_date: parse_date(sub.get_one::<String>("due").unwrap())?,
    };
    let installments = *sub.get_one::<u32>("installments").unwrap_or(&1);
    let ids = add_bill(conn, &draft, installments)?;
    if ids.len() == 1 {
        println!("Added bill '{}' as #{}", draft.title, ids[0]);
    } else {
        println!(
            "Added bill '{}' in {} installments (#{}..#{})",
            draft.title,
            ids.len(),
            ids[0],
            ids[ids.len() - 1]
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct BillRow {
    pub id: i64,
    pub title: String,
    pub amount: String,
    pub due_date: String,
    pub installment: String,
    pub paid: bool,
    pub paid_date: String,
}

impl From<&Bill> for BillRow {
    fn from(b: &Bill) -> Self {
        Self {
            id: b.id,
            title: b.title.clone(),
            amount: b.amount.to_string(),
            due_date: b.due_date.to_string(),
            installment: format!("{}/{}", b.installment_index, b.installment_total),
            paid: b.is_paid,
            paid_date: b.paid_date.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<BillRow>> {
    let filter = parse_period(sub)?;
    let status = sub
        .get_one::<String>("status")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "all".into());
    let keep: fn(&Bill) -> bool = match status.as_str() {
        "all" => |_| true,
        "paid" => |b| b.is_paid,
        "unpaid" => |b| !b.is_paid,
        other => bail!("Unknown status '{}', use paid|unpaid|all", other),
    };
    let bills = filter_by_period(&load_all(conn)?, filter, today());
    Ok(bills.iter().filter(|b| keep(b)).map(BillRow::from).collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.due_date,
                    r.title,
                    r.amount,
                    r.installment,
                    if r.paid { format!("paid {}", r.paid_date) } else { "open".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Due", "Title", "Amount", "Installment", "Status"], rows)
        );
    }
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub)?;
    let paid_date = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw)?,
        None => today(),
    };
    if !SqliteStore::new(conn).mark_bill_paid(id, paid_date)? {
        bail!("Bill {} not found", id);
    }
    tracing::info!(id, %paid_date, "bill paid");
    println!("Bill {} paid on {}", id, paid_date);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub)?;
    if !SqliteStore::new(conn).delete_bill(id)? {
        bail!("Bill {} not found", id);
    }
    tracing::info!(id, "bill deleted");
    println!("Removed bill {}", id);
    Ok(())
}

fn metrics(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filter = parse_period(sub)?;
    let m = compute_bill_metrics(&load_all(conn)?, filter, today());
    if !maybe_print_json(json_flag, jsonl_flag, &m)? {
        let rows = vec![
            vec![
                "Unpaid".to_string(),
                m.unpaid_bills_count.to_string(),
                fmt_money(&m.total_amount_to_pay),
            ],
            vec![
                "Paid".to_string(),
                m.paid_bills_count.to_string(),
                fmt_money(&m.total_amount_paid),
            ],
        ];
        println!("Period: {}", filter);
        println!("{}", pretty_table(&["Status", "Bills", "Amount"], rows));
    }
    Ok(())
}
