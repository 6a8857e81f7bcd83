// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::{LedgerRecord, LedgerRow, PersonnelRecord, PersonnelRow};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::Path;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("ledger", sub)) => import_ledger(conn, sub),
        Some(("personnel", sub)) => import_personnel(conn, sub),
        _ => Ok(()),
    }
}

/// Read a JSON array (`.json`) or a headed CSV file into raw rows. CSV cells
/// reach the row type as strings, so amounts never pass through `f64`.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Read {}", path.display()))?;
        let rows: Vec<T> = serde_json::from_str(&text)
            .with_context(|| format!("Parse JSON array in {}", path.display()))?;
        return Ok(rows);
    }
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))?;
    let headers = rdr
        .headers()
        .with_context(|| format!("Read CSV header of {}", path.display()))?
        .clone();
    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", i + 1))?;
        let fields: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
            .collect();
        let row: T = serde_json::from_value(Value::Object(fields))
            .with_context(|| format!("CSV row {}", i + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn validate_ledger(rows: Vec<LedgerRow>) -> Result<Vec<LedgerRecord>> {
    let mut out = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        out.push(row.into_record(i + 1)?);
    }
    Ok(out)
}

pub fn validate_personnel(rows: Vec<PersonnelRow>) -> Result<Vec<PersonnelRecord>> {
    let mut out = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        out.push(row.into_record(i + 1)?);
    }
    Ok(out)
}

fn import_ledger(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let records = validate_ledger(read_rows(Path::new(path))?)
        .with_context(|| format!("Invalid ledger file {}", path))?;
    let n = db::replace_ledger(conn, &records)?;
    println!("Imported {} ledger records from {}", n, path);
    Ok(())
}

fn import_personnel(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let records = validate_personnel(read_rows(Path::new(path))?)
        .with_context(|| format!("Invalid personnel file {}", path))?;
    let n = db::replace_personnel(conn, &records)?;
    println!("Imported {} personnel records from {}", n, path);
    Ok(())
}
