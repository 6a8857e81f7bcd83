// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::summarize_projects;
use crate::alerts::alerts_for_project;
use crate::commands::{personnel::employee_rows, projects::project_rows};
use crate::db;
use crate::models::Alert;
use crate::tabular::{
    ALERT_COLUMNS, Column, CsvOptions, EMPLOYEE_COLUMNS, EmployeeSort, LineEnding, PROJECT_COLUMNS,
    to_csv,
};
use crate::utils::resolve_today;
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("projects", sub)) => {
            let rows = project_rows(&db::load_ledger(conn)?, None);
            write_export(sub, &rows, PROJECT_COLUMNS, "projects")
        }
        Some(("personnel", sub)) => {
            let rows = employee_rows(&db::load_personnel(conn)?, None, EmployeeSort::Name, false);
            write_export(sub, &rows, EMPLOYEE_COLUMNS, "personnel")
        }
        Some(("alerts", sub)) => {
            let today = resolve_today(sub.get_one::<String>("today"))?;
            let rows: Vec<Alert> = summarize_projects(&db::load_ledger(conn)?)
                .iter()
                .flat_map(|s| alerts_for_project(s, "Project", today))
                .collect();
            write_export(sub, &rows, ALERT_COLUMNS, "alerts")
        }
        _ => Ok(()),
    }
}

fn write_export<T: Serialize>(
    sub: &clap::ArgMatches,
    rows: &[T],
    columns: &[Column<'_>],
    what: &str,
) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    let body = match fmt.as_str() {
        "csv" => {
            let opts = CsvOptions {
                header: !sub.get_flag("no-header"),
                line_ending: if sub.get_flag("crlf") {
                    LineEnding::CrLf
                } else {
                    LineEnding::Lf
                },
            };
            to_csv(rows, columns, opts)?
        }
        "json" => serde_json::to_string_pretty(rows)?,
        _ => return Err(anyhow!("Unknown format: {} (use csv|json)", fmt)),
    };
    std::fs::write(out, body)?;
    log::info!("exported {} {} rows to {}", rows.len(), what, out);
    println!("Exported {} to {}", what, out);
    Ok(())
}
