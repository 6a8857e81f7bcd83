// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::importer::{validate_ledger, validate_personnel};
use crate::db;
use crate::models::{LedgerRow, PersonnelRow};
use crate::utils::{get_setting, http_client};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use serde::de::DeserializeOwned;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("ledger", sub)) => {
            let url = endpoint(conn, sub, "ledger")?;
            let records = validate_ledger(fetch_rows::<LedgerRow>(&url)?)?;
            let n = db::replace_ledger(conn, &records)?;
            println!("Fetched {} ledger records from {}", n, url);
        }
        Some(("personnel", sub)) => {
            let url = endpoint(conn, sub, "personnel")?;
            let records = validate_personnel(fetch_rows::<PersonnelRow>(&url)?)?;
            let n = db::replace_personnel(conn, &records)?;
            println!("Fetched {} personnel records from {}", n, url);
        }
        _ => {}
    }
    Ok(())
}

/// `--url` wins; otherwise `<api_base_url>/<kind>`.
pub fn endpoint(conn: &Connection, sub: &clap::ArgMatches, kind: &str) -> Result<String> {
    if let Some(url) = sub.get_one::<String>("url") {
        return Ok(url.trim().to_string());
    }
    let base = get_setting(conn, "api_base_url")?.ok_or_else(|| {
        anyhow!("No --url given and api_base_url is not set (walter config set api_base_url ...)")
    })?;
    Ok(format!("{}/{}", base.trim_end_matches('/'), kind))
}

fn fetch_rows<T: DeserializeOwned>(url: &str) -> Result<Vec<T>> {
    log::info!("fetching {}", url);
    let client = http_client()?;
    let resp = client
        .get(url)
        .send()
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?;
    let rows: Vec<T> = resp
        .json()
        .with_context(|| format!("Decode JSON array from {}", url))?;
    log::debug!("received {} rows from {}", rows.len(), url);
    Ok(rows)
}
