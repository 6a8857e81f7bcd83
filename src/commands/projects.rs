// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{summarize_all_projects, summarize_project_by_number, summarize_projects};
use crate::db;
use crate::format::{CurrencyFormat, FormatterCache, format_date, format_percent};
use crate::models::{LedgerRecord, ProjectSummary, Totals};
use crate::tabular::{filter_projects, sort_by_end_date};
use crate::utils::{locale_and_currency, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

const NO_DATE: &str = "-";

pub fn handle(conn: &Connection, m: &clap::ArgMatches, cache: &mut FormatterCache) -> Result<()> {
    let (locale, currency) = locale_and_currency(conn)?;
    let money = cache.get(&locale, &currency);
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub, &money)?,
        Some(("show", sub)) => show(conn, sub, &money)?,
        Some(("summary", sub)) => summary(conn, sub, &money)?,
        _ => {}
    }
    Ok(())
}

/// Project summaries matching `filter`, ordered by award end date.
pub fn project_rows(records: &[LedgerRecord], filter: Option<&str>) -> Vec<ProjectSummary> {
    let all = summarize_projects(records);
    let mut rows: Vec<ProjectSummary> = filter_projects(&all, filter.unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();
    sort_by_end_date(&mut rows);
    rows
}

fn totals_cells(t: &Totals, money: &CurrencyFormat) -> Vec<String> {
    vec![
        money.format(t.budget),
        money.format(t.expense),
        money.format(t.encumbrance),
        money.format(t.balance),
        format_percent(t.balance, t.budget),
    ]
}

fn list(conn: &Connection, sub: &clap::ArgMatches, money: &CurrencyFormat) -> Result<()> {
    let records = db::load_ledger(conn)?;
    let rows = project_rows(&records, sub.get_one::<String>("filter").map(|s| s.as_str()));
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|p| {
            let mut cells = vec![
                p.project_number.clone(),
                p.project_name.clone(),
                p.pi_name.clone().unwrap_or_default(),
                format_date(p.end_date.as_deref(), NO_DATE),
            ];
            cells.extend(totals_cells(&p.totals, money));
            cells
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Project",
                "Name",
                "PI",
                "Ends",
                "Budget",
                "Expense",
                "Encumbrance",
                "Balance",
                "Remaining"
            ],
            data
        )
    );
    Ok(())
}

fn print_summary(s: &ProjectSummary, money: &CurrencyFormat) {
    println!("{} {}", s.project_number, s.project_name);
    println!(
        "PI: {}  PM: {}  Status: {}",
        s.pi_name.as_deref().unwrap_or("-"),
        s.pm_name.as_deref().unwrap_or("-"),
        s.status.as_deref().unwrap_or("-")
    );
    if let Some(co) = s.co_pi_names.as_deref() {
        println!("Co-PIs: {}", co);
    }
    println!(
        "Award: {} to {}",
        format_date(s.start_date.as_deref(), NO_DATE),
        format_date(s.end_date.as_deref(), NO_DATE)
    );
    let mut data: Vec<Vec<String>> = s
        .categories
        .iter()
        .map(|c| {
            let mut cells = vec![c.category.clone()];
            cells.extend(totals_cells(&c.totals, money));
            cells
        })
        .collect();
    let mut total = vec!["Total".to_string()];
    total.extend(totals_cells(&s.totals, money));
    data.push(total);
    println!(
        "{}",
        pretty_table(
            &[
                "Category",
                "Budget",
                "Expense",
                "Encumbrance",
                "Balance",
                "Remaining"
            ],
            data
        )
    );
}

fn show(conn: &Connection, sub: &clap::ArgMatches, money: &CurrencyFormat) -> Result<()> {
    let number = sub.get_one::<String>("project").unwrap().trim();
    let records = db::load_ledger(conn)?;
    match summarize_project_by_number(&records, number) {
        Some(s) => {
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
                print_summary(&s, money);
            }
        }
        None => println!("Project '{}' not found", number),
    }
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches, money: &CurrencyFormat) -> Result<()> {
    let records = db::load_ledger(conn)?;
    match summarize_all_projects(&records) {
        Some(s) => {
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
                print_summary(&s, money);
            }
        }
        None => println!("No ledger records; run `walter import ledger` or `walter fetch ledger`"),
    }
    Ok(())
}
