// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{aggregate_employees, personnel_for_project};
use crate::db;
use crate::format::FormatterCache;
use crate::models::{AggregatedEmployee, PersonnelRecord};
use crate::tabular::{EmployeeSort, sort_employees};
use crate::utils::{locale_and_currency, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, cache: &mut FormatterCache) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub, cache),
        _ => Ok(()),
    }
}

/// Aggregated employees, optionally restricted to one project's distributions.
pub fn employee_rows(
    records: &[PersonnelRecord],
    project: Option<&str>,
    sort: EmployeeSort,
    descending: bool,
) -> Vec<AggregatedEmployee> {
    let mut rows = match project {
        Some(p) => {
            let scoped: Vec<PersonnelRecord> = personnel_for_project(records, p)
                .into_iter()
                .cloned()
                .collect();
            aggregate_employees(&scoped)
        }
        None => aggregate_employees(records),
    };
    sort_employees(&mut rows, sort, descending);
    rows
}

fn list(conn: &Connection, sub: &clap::ArgMatches, cache: &mut FormatterCache) -> Result<()> {
    let records = db::load_personnel(conn)?;
    let sort: EmployeeSort = sub
        .get_one::<String>("sort")
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(EmployeeSort::Name);
    let rows = employee_rows(
        &records,
        sub.get_one::<String>("project").map(|s| s.trim()),
        sort,
        sub.get_flag("desc"),
    );
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let (locale, currency) = locale_and_currency(conn)?;
    let money = cache.get(&locale, &currency);
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|e| {
            vec![
                e.employee_id.clone(),
                e.name.clone(),
                e.positions
                    .iter()
                    .map(|p| p.position.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
                e.project_count.to_string(),
                money.format(e.annual_salary),
                money.format(e.annual_fringe),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Employee",
                "Name",
                "Positions",
                "Projects",
                "Annual Salary",
                "Annual Fringe"
            ],
            data
        )
    );
    Ok(())
}
