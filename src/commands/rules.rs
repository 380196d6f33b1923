// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::{Result, anyhow, bail};
use regex::Regex;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let pattern_raw = sub.get_one::<String>("pattern").unwrap();
            let pattern = pattern_raw.trim();
            Regex::new(pattern)
                .map_err(|err| anyhow!("Invalid regex pattern '{}': {}", pattern, err))?;

            let category = sub.get_one::<String>("category").unwrap().trim();
            if category.is_empty() {
                bail!("Rule category must not be empty");
            }
            conn.execute(
                "INSERT INTO rules(pattern, category) VALUES (?1, ?2)",
                params![pattern, category],
            )?;
            let id = conn.last_insert_rowid();
            tracing::info!(id, pattern, category, "rule added");
            println!("Added rule #{}: /{}/ -> {}", id, pattern, category);
        }
        Some(("list", _)) => {
            let mut stmt =
                conn.prepare("SELECT id, pattern, category FROM rules ORDER BY id DESC")?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (id, pat, cat) = row?;
                data.push(vec![id.to_string(), pat, cat]);
            }
            println!("{}", pretty_table(&["ID", "Pattern", "Category"], data));
        }
        Some(("rm", sub)) => {
            let raw = sub.get_one::<String>("id").unwrap();
            let id = raw.trim().parse::<i64>()?;
            let n = conn.execute("DELETE FROM rules WHERE id=?1", params![id])?;
            if n == 0 {
                bail!("Rule {} not found", id);
            }
            println!("Removed rule {}", id);
        }
        _ => {}
    }
    Ok(())
}
