// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{
    MeiMonthlyReport, aggregate_year, annual_limit_status, compute_weekly_insight, daily_series,
    filter_by_period, generate_monthly_closing,
};
use crate::commands::transactions::load_all;
use crate::config::{KEY_TAX_PERCENTAGE, Settings, validate_setting};
use crate::models::TransactionType;
use crate::utils::{
    fmt_money, fmt_pct, maybe_print_json, parse_month, parse_period, pretty_table, today,
};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("monthly", sub)) => monthly(conn, sub)?,
        Some(("mei", sub)) => mei(conn, sub)?,
        Some(("weekly", sub)) => weekly(conn, sub)?,
        Some(("daily", sub)) => daily(conn, sub)?,
        Some(("annual", sub)) => annual(conn, sub)?,
        _ => {}
    }
    Ok(())
}

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let year = *sub.get_one::<i32>("year").unwrap();
    let summary = aggregate_year(&load_all(conn)?, year);
    if !maybe_print_json(json_flag, jsonl_flag, &summary)? {
        let rows = summary
            .months
            .iter()
            .map(|m| {
                vec![
                    MONTH_NAMES[m.month as usize].to_string(),
                    fmt_money(&m.total_revenue),
                    fmt_money(&m.total_essential_expenses),
                    fmt_money(&m.total_non_essential_expenses),
                    fmt_money(&m.total_reserves),
                    fmt_money(&m.monthly_surplus),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Month", "Revenue", "Essential", "Non-essential", "Reserves", "Surplus"],
                rows,
            )
        );
        println!(
            "{}: revenue {}, surplus {}",
            year,
            fmt_money(&summary.total_revenue()),
            fmt_money(&summary.total_surplus())
        );
    }
    Ok(())
}

/// Builds the closing for `--month`, taking the tax rate and date basis from
/// the flags when given and from settings otherwise.
pub fn mei_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<MeiMonthlyReport> {
    let period = parse_month(sub.get_one::<String>("month").unwrap())?;
    let settings = Settings::load(conn)?;
    let tax_percentage = match sub.get_one::<String>("tax") {
        Some(raw) => validate_setting(KEY_TAX_PERCENTAGE, raw)?.parse::<Decimal>()?,
        None => settings.tax_percentage,
    };
    let use_competence = sub.get_flag("competence") || settings.use_competence_date;
    let txs = load_all(conn)?;
    if txs.iter().any(|t| t.r#type == TransactionType::Transfer) {
        tracing::debug!("transfers are left out of the MEI closing");
    }
    Ok(generate_monthly_closing(
        &txs,
        period.year,
        period.month,
        tax_percentage,
        use_competence,
    ))
}

fn mei(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let report = mei_report(conn, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }
    println!("MEI closing {}", report.period);
    println!(
        "{}",
        pretty_table(
            &["Item", "Value"],
            vec![
                vec![
                    format!("Revenue ({} entries)", report.revenue.count),
                    fmt_money(&report.revenue.total),
                ],
                vec!["Costs".into(), fmt_money(&report.costs.total)],
                vec![
                    format!("Tax reserve ({})", fmt_pct(&report.tax_percentage)),
                    fmt_money(&report.tax_reserve),
                ],
                vec!["Profit".into(), fmt_money(&report.profit)],
                vec!["Margin".into(), fmt_pct(&report.margin)],
            ],
        )
    );
    let rows = report
        .table_rows()
        .into_iter()
        .map(|c| {
            vec![
                c.display_name,
                c.count.to_string(),
                fmt_money(&c.amount),
                fmt_pct(&c.percentage),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Entries", "Amount", "Share"], rows)
    );
    Ok(())
}

fn weekly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filter = parse_period(sub)?;
    let txs = filter_by_period(&load_all(conn)?, filter, today());
    let weekly = compute_weekly_insight(&txs);
    if maybe_print_json(json_flag, jsonl_flag, &weekly)? {
        return Ok(());
    }
    let rows = weekly
        .per_day
        .iter()
        .map(|d| {
            vec![
                d.day.to_string(),
                d.count.to_string(),
                fmt_money(&d.total),
                fmt_money(&d.average),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Day", "Expenses", "Total", "Average"], rows)
    );
    match weekly.insight {
        Some(i) => println!(
            "Highest: {} ({} avg). Lowest: {} ({} avg).",
            i.highest_spending_day,
            fmt_money(&i.highest_average),
            i.lowest_spending_day,
            fmt_money(&i.lowest_average)
        ),
        None => println!("No expenses in {}", filter),
    }
    Ok(())
}

fn daily(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let period = parse_month(sub.get_one::<String>("month").unwrap())?;
    let series = daily_series(&load_all(conn)?, period);
    if !maybe_print_json(json_flag, jsonl_flag, &series)? {
        let rows = series
            .iter()
            .map(|p| {
                vec![
                    p.date.to_string(),
                    fmt_money(&p.income),
                    fmt_money(&p.expense),
                    fmt_money(&p.balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Income", "Expense", "Balance"], rows)
        );
    }
    Ok(())
}

fn annual(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let year = *sub.get_one::<i32>("year").unwrap();
    let settings = Settings::load(conn)?;
    let status = annual_limit_status(&load_all(conn)?, year, settings.annual_limit);
    if !maybe_print_json(json_flag, jsonl_flag, &status)? {
        println!(
            "{}",
            pretty_table(
                &["Year", "Revenue", "Limit", "Used", "Remaining"],
                vec![vec![
                    status.year.to_string(),
                    fmt_money(&status.revenue),
                    fmt_money(&status.limit),
                    fmt_pct(&status.used_percentage),
                    fmt_money(&status.remaining),
                ]],
            )
        );
        if status.exceeded() {
            tracing::warn!(year, "annual revenue limit exceeded");
            println!("Annual limit exceeded by {}", fmt_money(&(status.revenue - status.limit)));
        }
    }
    Ok(())
}
