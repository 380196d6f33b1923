// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-user settings kept as key/value rows in the `settings` table.

use crate::errors::FinanceError;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;

pub const KEY_TAX_PERCENTAGE: &str = "tax_percentage";
pub const KEY_ANNUAL_LIMIT: &str = "annual_limit";
pub const KEY_USE_COMPETENCE_DATE: &str = "use_competence_date";
pub const KEY_RETRY_MAX_ATTEMPTS: &str = "retry_max_attempts";
pub const KEY_RETRY_DELAY_MS: &str = "retry_delay_ms";

pub const KEYS: [&str; 5] = [
    KEY_TAX_PERCENTAGE,
    KEY_ANNUAL_LIMIT,
    KEY_USE_COMPETENCE_DATE,
    KEY_RETRY_MAX_ATTEMPTS,
    KEY_RETRY_DELAY_MS,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl RetryPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub tax_percentage: Decimal,
    pub annual_limit: Decimal,
    pub use_competence_date: bool,
    pub retry: RetryPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tax_percentage: Decimal::from(6),
            annual_limit: Decimal::from(81_000),
            use_competence_date: false,
            retry: RetryPolicy::default(),
        }
    }
}

fn get_raw(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

fn invalid(key: &str, reason: impl Into<String>) -> FinanceError {
    FinanceError::InvalidSetting {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, FinanceError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(invalid(key, format!("'{}' is not a boolean", other))),
    }
}

fn parse_non_negative(key: &str, raw: &str) -> Result<Decimal, FinanceError> {
    let v = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|_| invalid(key, format!("'{}' is not a number", raw.trim())))?;
    if v.is_sign_negative() && !v.is_zero() {
        return Err(invalid(key, "must not be negative"));
    }
    Ok(v)
}

/// Checks a raw value for `key` and returns its canonical text form.
pub fn validate_setting(key: &str, raw: &str) -> Result<String, FinanceError> {
    match key {
        KEY_TAX_PERCENTAGE => {
            let v = parse_non_negative(key, raw)?;
            if v > Decimal::ONE_HUNDRED {
                return Err(invalid(key, "must be between 0 and 100"));
            }
            Ok(v.to_string())
        }
        KEY_ANNUAL_LIMIT => Ok(parse_non_negative(key, raw)?.to_string()),
        KEY_USE_COMPETENCE_DATE => Ok(parse_bool(key, raw)?.to_string()),
        KEY_RETRY_MAX_ATTEMPTS => match raw.trim().parse::<u32>() {
            Ok(n) if n >= 1 => Ok(n.to_string()),
            _ => Err(invalid(key, "must be a whole number of at least 1")),
        },
        KEY_RETRY_DELAY_MS => raw
            .trim()
            .parse::<u64>()
            .map(|n| n.to_string())
            .map_err(|_| invalid(key, "must be a whole number of milliseconds")),
        other => Err(invalid(other, format!("unknown key (use {})", KEYS.join("|")))),
    }
}

impl Settings {
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut s = Settings::default();
        if let Some(v) = get_raw(conn, KEY_TAX_PERCENTAGE)? {
            s.tax_percentage = parse_non_negative(KEY_TAX_PERCENTAGE, &v)?;
        }
        if let Some(v) = get_raw(conn, KEY_ANNUAL_LIMIT)? {
            s.annual_limit = parse_non_negative(KEY_ANNUAL_LIMIT, &v)?;
        }
        if let Some(v) = get_raw(conn, KEY_USE_COMPETENCE_DATE)? {
            s.use_competence_date = parse_bool(KEY_USE_COMPETENCE_DATE, &v)?;
        }
        if let Some(v) = get_raw(conn, KEY_RETRY_MAX_ATTEMPTS)? {
            s.retry.max_attempts = validate_setting(KEY_RETRY_MAX_ATTEMPTS, &v)?.parse()?;
        }
        if let Some(v) = get_raw(conn, KEY_RETRY_DELAY_MS)? {
            s.retry.delay_ms = validate_setting(KEY_RETRY_DELAY_MS, &v)?.parse()?;
        }
        tracing::debug!(?s, "settings loaded");
        Ok(s)
    }

    pub fn set(conn: &Connection, key: &str, raw: &str) -> Result<String> {
        let value = validate_setting(key, raw)?;
        conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        tracing::info!(key, value = %value, "setting updated");
        Ok(value)
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        vec![
            vec![KEY_TAX_PERCENTAGE.into(), self.tax_percentage.to_string()],
            vec![KEY_ANNUAL_LIMIT.into(), self.annual_limit.to_string()],
            vec![
                KEY_USE_COMPETENCE_DATE.into(),
                self.use_competence_date.to_string(),
            ],
            vec![
                KEY_RETRY_MAX_ATTEMPTS.into(),
                self.retry.max_attempts.to_string(),
            ],
            vec![KEY_RETRY_DELAY_MS.into(), self.retry.delay_ms.to_string()],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);")
            .unwrap();
        conn
    }

    #[test]
    fn defaults_apply_without_rows() {
        let s = Settings::load(&conn()).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.tax_percentage, Decimal::from(6));
    }

    #[test]
    fn set_then_load_round_trips() {
        let conn = conn();
        Settings::set(&conn, KEY_TAX_PERCENTAGE, " 5.5 ").unwrap();
        Settings::set(&conn, KEY_USE_COMPETENCE_DATE, "yes").unwrap();
        Settings::set(&conn, KEY_RETRY_MAX_ATTEMPTS, "5").unwrap();
        let s = Settings::load(&conn).unwrap();
        assert_eq!(s.tax_percentage, Decimal::new(55, 1));
        assert!(s.use_competence_date);
        assert_eq!(s.retry.max_attempts, 5);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let conn = conn();
        assert!(Settings::set(&conn, KEY_TAX_PERCENTAGE, "150").is_err());
        assert!(Settings::set(&conn, KEY_ANNUAL_LIMIT, "-1").is_err());
        assert!(Settings::set(&conn, KEY_RETRY_MAX_ATTEMPTS, "0").is_err());
        assert!(Settings::set(&conn, "theme", "dark").is_err());
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM settings", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
