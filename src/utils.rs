// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::PeriodFilter;
use crate::errors::FinanceError;
use crate::models::YearMonth;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use regex::Regex;
use rusqlite::Connection;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the global subscriber. Logs go to stderr; `RUST_LOG` overrides
/// the default `caixa=warn`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("caixa=warn"));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s.trim()))
}

pub fn parse_month(s: &str) -> Result<YearMonth> {
    Ok(s.parse::<YearMonth>()?)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s.trim()))
}

/// Amounts are magnitudes; the transaction type carries the direction.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d.is_sign_negative() && !d.is_zero() {
        return Err(FinanceError::NegativeAmount(d).into());
    }
    Ok(d)
}

pub fn parse_period(sub: &clap::ArgMatches) -> Result<PeriodFilter> {
    let name = sub
        .get_one::<String>("period")
        .map(|s| s.as_str())
        .unwrap_or("always");
    let month = sub.get_one::<String>("month").map(|s| s.as_str());
    let filter = PeriodFilter::parse(name, month)?;
    if filter == PeriodFilter::CustomMonth(None) {
        tracing::warn!("--period custom-month given without --month; showing all records");
    }
    Ok(filter)
}

pub fn fmt_money(d: &Decimal) -> String {
    format!(
        "R$ {:.2}",
        d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

pub fn fmt_pct(d: &Decimal) -> String {
    format!(
        "{:.1}%",
        d.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    )
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// First matching rule (newest first) wins; rules with broken patterns are
/// skipped.
pub fn apply_category_rules(conn: &Connection, description: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT id, pattern, category FROM rules ORDER BY id DESC")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let pat: String = r.get(1)?;
        let category: String = r.get(2)?;
        match Regex::new(&pat) {
            Ok(re) if re.is_match(description) => {
                tracing::debug!(rule = id, category = %category, "category rule matched");
                return Ok(Some(category));
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(rule = id, error = %err, "skipping rule with invalid pattern")
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_must_not_be_negative() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), Decimal::new(1250, 2));
        let err = parse_amount("-3").unwrap_err();
        assert!(err.to_string().contains("must not be negative"));
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn money_and_percent_formatting() {
        assert_eq!(fmt_money(&Decimal::new(12345, 3)), "R$ 12.35");
        assert_eq!(fmt_money(&Decimal::from(5000)), "R$ 5000.00");
        assert_eq!(fmt_pct(&Decimal::from(85)), "85.0%");
    }
}
