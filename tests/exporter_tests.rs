// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::tempdir;
use walter::commands::exporter;
use walter::models::{LedgerRecord, PersonnelRecord};
use walter::{cli, db};

fn ledger(project: &str, budget: i64, balance: i64, end: Option<&str>) -> LedgerRecord {
    LedgerRecord {
        project_number: project.into(),
        project_name: format!("{}, phase 1", project),
        task_number: None,
        category: None,
        budget: Decimal::from(budget),
        expense: Decimal::from(budget - balance),
        encumbrance: Decimal::ZERO,
        balance: Decimal::from(balance),
        award_start_date: None,
        award_end_date: end.map(str::to_string),
        project_status: None,
        pi_id: None,
        pi_name: None,
        pm_id: None,
        pm_name: None,
        co_pi_names: None,
    }
}

fn seeded_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    db::replace_ledger(
        &mut conn,
        &[
            ledger("P-1", 1000, 500, Some("2099-12-31")),
            ledger("P-2", 1000, -20, None),
        ],
    )
    .unwrap();
    db::replace_personnel(
        &mut conn,
        &[PersonnelRecord {
            employee_id: "E1".into(),
            name: "Sam Lee".into(),
            position: "Postdoc".into(),
            monthly_rate: Decimal::from(5000),
            benefit_rate: "0.25".parse().unwrap(),
            distribution_percent: Decimal::from(100),
            funding_end_date: None,
            project_number: "P-1".into(),
        }],
    )
    .unwrap();
    conn
}

fn run_export(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["walter", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn exports_projects_csv_in_end_date_order() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("projects.csv");
    let out_str = out.to_string_lossy().to_string();
    run_export(&conn, &["projects", "--format", "csv", "--out", &out_str]).unwrap();

    let contents = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = contents.split('\n').collect();
    assert_eq!(
        lines[0],
        "Project,Name,PI,PM,Status,Start,End,Budget,Expense,Encumbrance,Balance"
    );
    assert_eq!(lines[1], "P-2,\"P-2, phase 1\",,,,,,1000,1020,0,-20");
    assert_eq!(lines[2], "P-1,\"P-1, phase 1\",,,,,2099-12-31,1000,500,0,500");
    assert_eq!(lines.len(), 3);
}

#[test]
fn exports_personnel_crlf_with_bom() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("people.csv");
    let out_str = out.to_string_lossy().to_string();
    run_export(&conn, &["personnel", "--out", &out_str, "--crlf"]).unwrap();

    let contents = std::fs::read_to_string(&out).unwrap();
    assert!(contents.starts_with('\u{feff}'));
    let body = contents.trim_start_matches('\u{feff}');
    let lines: Vec<&str> = body.split("\r\n").collect();
    assert_eq!(lines[0], "Employee ID,Name,Projects,Annual Salary,Annual Fringe");
    assert_eq!(lines[1], "E1,Sam Lee,1,60000,15000.00");
}

#[test]
fn exports_alerts_json() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("alerts.json");
    let out_str = out.to_string_lossy().to_string();
    run_export(
        &conn,
        &["alerts", "--format", "json", "--out", &out_str, "--today", "2025-01-15"],
    )
    .unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["type"], "negative-balance");
    assert_eq!(arr[0]["severity"], "error");
    assert_eq!(arr[0]["project_number"], "P-2");
}

#[test]
fn export_rejects_unknown_format() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.unknown");
    let out_str = out.to_string_lossy().to_string();
    assert!(run_export(&conn, &["projects", "--format", "xml", "--out", &out_str]).is_err());
    assert!(!out.exists());
}
