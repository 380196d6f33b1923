// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::generate_monthly_closing;
use crate::commands::transactions::{TransactionRow, load_all};
use crate::config::Settings;
use crate::models::YearMonth;
use crate::utils::parse_month;
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => bail!("Unknown format: {} (use csv|json)", other),
        }
    }
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let fmt = sub.get_one::<String>("format").unwrap().parse::<ExportFormat>()?;
            let out = sub.get_one::<String>("out").unwrap();
            let n = export_transactions(conn, fmt, out)?;
            println!("Exported {} transactions to {}", n, out);
        }
        Some(("mei", sub)) => {
            let period = parse_month(sub.get_one::<String>("month").unwrap())?;
            let fmt = sub.get_one::<String>("format").unwrap().parse::<ExportFormat>()?;
            let out = sub.get_one::<String>("out").unwrap();
            export_mei(conn, period, fmt, out)?;
            println!("Exported MEI closing {} to {}", period, out);
        }
        _ => {}
    }
    Ok(())
}

/// Same layout `import transactions` reads, so an export can be re-imported.
pub const TRANSACTION_COLUMNS: [&str; 8] = [
    "date",
    "type",
    "amount",
    "category",
    "description",
    "competence_date",
    "is_recurring",
    "next_due_date",
];

pub fn export_transactions(
    conn: &Connection,
    fmt: ExportFormat,
    out: impl AsRef<Path>,
) -> Result<usize> {
    let rows: Vec<TransactionRow> = load_all(conn)?.iter().map(TransactionRow::from).collect();
    match fmt {
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_path(out.as_ref())?;
            wtr.write_record(TRANSACTION_COLUMNS)?;
            for r in &rows {
                wtr.write_record([
                    r.date.as_str(),
                    r.r#type.as_str(),
                    r.amount.as_str(),
                    r.category.as_str(),
                    r.description.as_str(),
                    r.competence_date.as_str(),
                    if r.recurring { "true" } else { "false" },
                    r.next_due_date.as_str(),
                ])?;
            }
            wtr.flush()?;
        }
        ExportFormat::Json => {
            std::fs::write(out.as_ref(), serde_json::to_string_pretty(&rows)?)?;
        }
    }
    tracing::info!(count = rows.len(), out = %out.as_ref().display(), "transactions exported");
    Ok(rows.len())
}

/// Writes the category table with its total row, plus the summary figures.
pub fn export_mei(
    conn: &Connection,
    period: YearMonth,
    fmt: ExportFormat,
    out: impl AsRef<Path>,
) -> Result<()> {
    let settings = Settings::load(conn)?;
    let report = generate_monthly_closing(
        &load_all(conn)?,
        period.year,
        period.month,
        settings.tax_percentage,
        settings.use_competence_date,
    );
    match fmt {
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_path(out.as_ref())?;
            wtr.write_record(["category", "count", "amount", "percentage"])?;
            for c in report.table_rows() {
                wtr.write_record([
                    c.display_name,
                    c.count.to_string(),
                    c.amount.to_string(),
                    c.percentage.round_dp(2).to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        ExportFormat::Json => {
            let doc = json!({
                "period": period.to_string(),
                "revenue": report.revenue,
                "costs": report.table_rows(),
                "tax_percentage": report.tax_percentage,
                "tax_reserve": report.tax_reserve,
                "profit": report.profit,
                "margin": report.margin,
            });
            std::fs::write(out.as_ref(), serde_json::to_string_pretty(&doc)?)?;
        }
    }
    tracing::info!(%period, out = %out.as_ref().display(), "MEI closing exported");
    Ok(())
}
