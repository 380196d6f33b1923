// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::classifier::known_categories;
use crate::analytics::{category_display_name, classify, is_known_category};
use crate::utils::pretty_table;
use anyhow::Result;

/// Category buckets are a fixed table, so nothing here needs the database.
pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", _)) => {
            let data = known_categories()
                .into_iter()
                .map(|k| {
                    vec![
                        k.key.to_string(),
                        k.display_name.to_string(),
                        k.bucket.as_str().to_string(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["Key", "Name", "Bucket"], data));
        }
        Some(("classify", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let bucket = classify(name);
            if is_known_category(name) {
                println!("{} -> {}", category_display_name(name), bucket.as_str());
            } else {
                println!("{} -> {} (unknown label, default bucket)", name.trim(), bucket.as_str());
            }
        }
        _ => {}
    }
    Ok(())
}
