// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use caixa::{cli, commands::importer, db::init_schema};
use rusqlite::Connection;
use std::io::Write;
use tempfile::NamedTempFile;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    init_schema(&mut conn).unwrap();
    conn
}

fn csv_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,type,amount,category,description,competence_date").unwrap();
    write!(file, "{}", body).unwrap();
    file.flush().unwrap();
    file
}

fn count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn importer_trims_cli_path_argument() {
    let mut conn = setup();
    let file = csv_file("2025-02-03,expense,5.00,lazer,Cinema,\n");
    let padded = format!("  {}  ", file.path().to_str().unwrap());

    let matches = cli::build_cli()
        .try_get_matches_from(["caixa", "import", "transactions", "--path", &padded])
        .unwrap();
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(&mut conn, import_m).unwrap();
    } else {
        panic!("import command not parsed");
    }
    assert_eq!(count(&conn), 1);
}

#[test]
fn competence_date_and_rules_are_applied() {
    let mut conn = setup();
    conn.execute("INSERT INTO rules(pattern, category) VALUES('(?i)^uber', 'transporte')", [])
        .unwrap();
    let file = csv_file(concat!(
        "2025-03-01,income,3000,receita,Cliente A,2025-02-28\n",
        "2025-03-02,expense,23.40,,Uber *trip,\n",
    ));
    assert_eq!(importer::import_transactions(&mut conn, file.path()).unwrap(), 2);

    let (competence, category): (Option<String>, String) = conn
        .query_row(
            "SELECT (SELECT competence_date FROM transactions WHERE type='income'), \
                    (SELECT category FROM transactions WHERE type='expense')",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(competence.as_deref(), Some("2025-02-28"));
    assert_eq!(category, "transporte");
}

#[test]
fn a_bad_row_rolls_back_the_whole_file() {
    let mut conn = setup();
    let file = csv_file("2025-03-01,income,3000,receita,ok,\n2025-03-02,expense,-10,lazer,bad,\n");
    let err = importer::import_transactions(&mut conn, file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("line 3"));
    assert_eq!(count(&conn), 0);
}

#[test]
fn trailing_recurring_columns_are_optional() {
    let mut conn = setup();
    let file = csv_file(concat!(
        "2025-03-01,expense,59.90,assinaturas,Streaming,,true,2025-04-01\n",
        "2025-03-02,expense,10,lazer,Cinema,\n",
    ));
    assert_eq!(importer::import_transactions(&mut conn, file.path()).unwrap(), 2);
    let recurring: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transactions WHERE is_recurring=1 AND next_due_date='2025-04-01'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(recurring, 1);

    let bad = csv_file("2025-03-01,expense,1,lazer,x,,maybe,\n");
    let err = importer::import_transactions(&mut conn, bad.path()).unwrap_err();
    assert!(err.to_string().contains("is_recurring"));
    assert_eq!(count(&conn), 2);
}
