// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};

const UA: &str = concat!("walter/", env!("CARGO_PKG_VERSION"));

/// Known settings and their defaults. `None` means no default.
pub const SETTINGS: &[(&str, Option<&str>)] = &[
    ("locale", Some("en")),
    ("currency", Some("USD")),
    ("api_base_url", None),
];

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// The `--today` override if given, else the local calendar date.
pub fn resolve_today(arg: Option<&String>) -> Result<NaiveDate> {
    match arg {
        Some(s) => parse_date(s.trim()),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

fn setting_default(key: &str) -> Result<Option<&'static str>> {
    SETTINGS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, d)| *d)
        .ok_or_else(|| anyhow!("Unknown setting '{}'", key))
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let default = setting_default(key)?;
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.or_else(|| default.map(str::to_string)))
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    setting_default(key)?;
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn locale_and_currency(conn: &Connection) -> Result<(String, String)> {
    let locale = get_setting(conn, "locale")?.unwrap_or_else(|| "en".into());
    let currency = get_setting(conn, "currency")?.unwrap_or_else(|| "USD".into());
    Ok((locale, currency))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
