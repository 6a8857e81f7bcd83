// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::summarize_project_by_number;
use crate::alerts::{alerts_for_project, pi_project_alerts};
use crate::db;
use crate::models::{LedgerRecord, ManagedPi};
use crate::utils::{maybe_print_json, pretty_table, resolve_today};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("project", sub)) => project(conn, sub)?,
        Some(("pi", sub)) => pi(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Build the supervised-PI view from ledger rows tagged with each PI id.
/// The display name comes from the first matching row.
pub fn managed_pis(records: &[LedgerRecord], pi_ids: &[String]) -> Vec<ManagedPi> {
    pi_ids
        .iter()
        .map(|id| {
            let rows: Vec<LedgerRecord> = records
                .iter()
                .filter(|r| r.pi_id.as_deref() == Some(id.as_str()))
                .cloned()
                .collect();
            let name = rows
                .iter()
                .find_map(|r| r.pi_name.clone())
                .unwrap_or_else(|| id.clone());
            ManagedPi {
                pi_id: id.clone(),
                name,
                records: rows,
            }
        })
        .collect()
}

fn project(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let number = sub.get_one::<String>("project").unwrap().trim();
    let today = resolve_today(sub.get_one::<String>("today"))?;
    let records = db::load_ledger(conn)?;
    let Some(summary) = summarize_project_by_number(&records, number) else {
        println!("Project '{}' not found", number);
        return Ok(());
    };
    let alerts = alerts_for_project(&summary, "Project", today);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &alerts)? {
        return Ok(());
    }
    if alerts.is_empty() {
        println!("No alerts for {}", number);
        return Ok(());
    }
    let data = alerts
        .iter()
        .map(|a| vec![a.severity.to_string(), a.kind.to_string(), a.message.clone()])
        .collect();
    println!("{}", pretty_table(&["Severity", "Type", "Message"], data));
    Ok(())
}

fn pi(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ids: Vec<String> = sub
        .get_many::<String>("pi")
        .map(|v| v.map(|s| s.trim().to_string()).collect())
        .unwrap_or_default();
    let today = resolve_today(sub.get_one::<String>("today"))?;
    let records = db::load_ledger(conn)?;
    let managed = managed_pis(&records, &ids);
    let alerts = pi_project_alerts(&managed, today);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &alerts)? {
        return Ok(());
    }
    if alerts.is_empty() {
        println!("No alerts for the selected PIs");
        return Ok(());
    }
    let data = alerts
        .iter()
        .map(|a| {
            vec![
                a.pi_id.clone(),
                a.alert.severity.to_string(),
                a.alert.kind.to_string(),
                format!("{:.2}", a.balance),
                a.alert.message.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["PI", "Severity", "Type", "Balance", "Message"], data)
    );
    Ok(())
}
