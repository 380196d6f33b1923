// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use caixa::{cli, commands::reports, config::Settings, db::init_schema};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    init_schema(&mut conn).unwrap();
    for (date, kind, amount, cat, competence) in [
        ("2024-03-05", "income", "5000", "receita", None),
        ("2024-03-10", "expense", "300", "moradia", None),
        ("2024-03-12", "expense", "150", "lazer", None),
        ("2024-03-20", "transfer", "999", "reserva", None),
        ("2024-04-02", "income", "1000", "receita", Some("2024-03-28")),
    ] {
        conn.execute(
            "INSERT INTO transactions(date, amount, type, category, competence_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![date, amount, kind, cat, competence],
        )
        .unwrap();
    }
    conn
}

fn mei(conn: &Connection, args: &[&str]) -> caixa::analytics::MeiMonthlyReport {
    let mut argv = vec!["caixa", "report", "mei"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().try_get_matches_from(argv).unwrap();
    let report_m = matches.subcommand_matches("report").unwrap();
    reports::mei_report(conn, report_m.subcommand_matches("mei").unwrap()).unwrap()
}

#[test]
fn mei_closing_uses_default_tax_reserve() {
    let conn = setup();
    let r = mei(&conn, &["--month", "2024-03"]);
    assert_eq!(r.revenue.total, Decimal::from(5000));
    assert_eq!(r.costs.total, Decimal::from(450));
    assert_eq!(r.tax_reserve, Decimal::from(300));
    assert_eq!(r.profit, Decimal::from(4250));
    assert_eq!(r.margin, Decimal::from(85));
}

#[test]
fn tax_flag_overrides_settings() {
    let conn = setup();
    Settings::set(&conn, "tax_percentage", "10").unwrap();
    assert_eq!(mei(&conn, &["--month", "2024-03"]).tax_reserve, Decimal::from(500));
    assert_eq!(
        mei(&conn, &["--month", "2024-03", "--tax", "0"]).tax_reserve,
        Decimal::ZERO
    );
}

#[test]
fn competence_basis_comes_from_flag_or_settings() {
    let conn = setup();
    assert_eq!(mei(&conn, &["--month", "2024-03"]).revenue.count, 1);
    assert_eq!(
        mei(&conn, &["--month", "2024-03", "--competence"]).revenue.total,
        Decimal::from(6000)
    );
    Settings::set(&conn, "use_competence_date", "true").unwrap();
    assert_eq!(mei(&conn, &["--month", "2024-03"]).revenue.count, 2);
}

#[test]
fn every_report_renders() {
    let conn = setup();
    for args in [
        vec!["caixa", "report", "monthly", "--year", "2024"],
        vec!["caixa", "report", "monthly", "--year", "2024", "--json"],
        vec!["caixa", "report", "mei", "--month", "2024-03"],
        vec!["caixa", "report", "weekly"],
        vec!["caixa", "report", "weekly", "--jsonl"],
        vec!["caixa", "report", "daily", "--month", "2024-03"],
        vec!["caixa", "report", "annual", "--year", "2024"],
    ] {
        let matches = cli::build_cli().try_get_matches_from(args).unwrap();
        let report_m = matches.subcommand_matches("report").unwrap();
        reports::handle(&conn, report_m).unwrap();
    }
}

#[test]
fn malformed_month_is_an_error() {
    let conn = setup();
    let matches = cli::build_cli()
        .try_get_matches_from(["caixa", "report", "daily", "--month", "2024-3"])
        .unwrap();
    let report_m = matches.subcommand_matches("report").unwrap();
    let err = reports::handle(&conn, report_m).unwrap_err();
    assert!(err.to_string().contains("Invalid month"));
}
