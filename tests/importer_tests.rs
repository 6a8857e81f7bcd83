// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};
use walter::commands::importer::{self, validate_ledger, validate_personnel};
use walter::errors::RecordError;
use walter::models::{AmountText, LedgerRow, PersonnelRow};
use walter::{cli, db};

fn base_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run_import(conn: &mut Connection, kind: &str, path: &str) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["walter", "import", kind, "--path", path]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn imports_ledger_csv_and_derives_missing_balance() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "project_number,project_name,category,budget,expense,encumbrance,balance,award_end_date,pi_id,pi_name\n\
         P-1,Reef Survey,Salaries,1000.50,200,50.25,,2026-06-30,PI7,Ada Lovelace\n\
         P-1,Reef Survey,,300,400,0,-100,,PI7,Ada Lovelace\n\
         P-2, Glacier ,Travel,\"1,500\",0,0,1500,,,"
    )
    .unwrap();
    file.flush().unwrap();

    let padded = format!("  {}  ", file.path().to_str().unwrap());
    run_import(&mut conn, "ledger", &padded).unwrap();

    let records = db::load_ledger(&conn).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].balance, "750.25".parse::<Decimal>().unwrap());
    assert_eq!(records[0].award_end_date.as_deref(), Some("2026-06-30"));
    assert_eq!(records[1].category, None);
    assert_eq!(records[1].balance, Decimal::from(-100));
    assert_eq!(records[2].project_name, "Glacier");
    assert_eq!(records[2].budget, Decimal::from(1500));
    assert_eq!(records[2].pi_id, None);
}

#[test]
fn import_replaces_previous_snapshot() {
    let mut conn = base_conn();
    for budget in ["10", "20"] {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "project_number,budget\nP-9,{}", budget).unwrap();
        file.flush().unwrap();
        run_import(&mut conn, "ledger", file.path().to_str().unwrap()).unwrap();
    }
    let records = db::load_ledger(&conn).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].budget, Decimal::from(20));
    assert_eq!(records[0].project_name, "P-9");
}

#[test]
fn imports_camel_case_json_with_numeric_amounts() {
    let mut conn = base_conn();
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"[
            {{"projectNumber": "P-3", "projectName": "Soil", "categoryName": "Supplies",
              "budget": 1000, "expenses": 250.5, "commitments": "0",
              "awardEndDate": "2025-12-31", "piName": "Grace Hopper"}}
        ]"#
    )
    .unwrap();
    file.flush().unwrap();
    run_import(&mut conn, "ledger", file.path().to_str().unwrap()).unwrap();

    let records = db::load_ledger(&conn).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category.as_deref(), Some("Supplies"));
    assert_eq!(records[0].balance, "749.5".parse::<Decimal>().unwrap());
    assert_eq!(records[0].pi_name.as_deref(), Some("Grace Hopper"));
}

#[test]
fn amounts_keep_every_digit_from_csv_and_json() {
    let exact = "12345678901234567.89".parse::<Decimal>().unwrap();

    let mut conn = base_conn();
    let mut csv_file = NamedTempFile::new().unwrap();
    writeln!(csv_file, "project_number,budget\nP-1,12345678901234567.89").unwrap();
    csv_file.flush().unwrap();
    run_import(&mut conn, "ledger", csv_file.path().to_str().unwrap()).unwrap();
    let records = db::load_ledger(&conn).unwrap();
    assert_eq!(records[0].budget, exact);
    assert_eq!(records[0].balance, exact);

    let mut json_file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        json_file,
        r#"[{{"projectNumber": "P-2", "budget": 12345678901234567.89, "expenses": 0.1}}]"#
    )
    .unwrap();
    json_file.flush().unwrap();
    run_import(&mut conn, "ledger", json_file.path().to_str().unwrap()).unwrap();
    let records = db::load_ledger(&conn).unwrap();
    assert_eq!(records[0].budget, exact);
    assert_eq!(records[0].expense, "0.1".parse::<Decimal>().unwrap());
    assert_eq!(
        records[0].balance,
        "12345678901234567.79".parse::<Decimal>().unwrap()
    );
}

#[test]
fn imports_personnel_csv() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "employee_id,name,position,monthly_rate,benefit_rate,distribution_percent,funding_end_date,project_number\n\
         E1,Sam Lee,Research Assistant,3000,0.1,50,2025-08-31,P-1\n\
         E1,Sam Lee,Research Assistant,3000,0.1,50,,P-2"
    )
    .unwrap();
    file.flush().unwrap();
    run_import(&mut conn, "personnel", file.path().to_str().unwrap()).unwrap();

    let records = db::load_personnel(&conn).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].monthly_rate, Decimal::from(3000));
    assert_eq!(records[0].funding_end_date.as_deref(), Some("2025-08-31"));
    assert_eq!(records[1].funding_end_date, None);
}

#[test]
fn bad_rows_are_rejected_with_row_numbers() {
    let err = validate_ledger(vec![
        LedgerRow {
            project_number: Some("P-1".into()),
            ..Default::default()
        },
        LedgerRow::default(),
    ])
    .unwrap_err();
    assert_eq!(
        err.downcast_ref::<RecordError>(),
        Some(&RecordError::MissingField {
            row: 2,
            field: "project_number"
        })
    );

    let err = validate_personnel(vec![PersonnelRow {
        employee_id: Some("E1".into()),
        project_number: Some("P-1".into()),
        monthly_rate: Some(AmountText("lots".into())),
        ..Default::default()
    }])
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RecordError>(),
        Some(RecordError::InvalidAmount { row: 1, field: "monthly_rate", .. })
    ));
}

#[test]
fn failed_import_keeps_existing_snapshot() {
    let mut conn = base_conn();
    let mut good = NamedTempFile::new().unwrap();
    writeln!(good, "project_number,budget\nP-1,10").unwrap();
    good.flush().unwrap();
    run_import(&mut conn, "ledger", good.path().to_str().unwrap()).unwrap();

    let mut bad = NamedTempFile::new().unwrap();
    writeln!(bad, "project_number,budget\nP-2,ten").unwrap();
    bad.flush().unwrap();
    assert!(run_import(&mut conn, "ledger", bad.path().to_str().unwrap()).is_err());

    let records = db::load_ledger(&conn).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].project_number, "P-1");
}
