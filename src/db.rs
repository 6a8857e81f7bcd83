// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{LedgerRecord, PersonnelRecord};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("edu.walter", "Walter", "walter"));

pub const DB_ENV: &str = "WALTER_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("walter.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- Snapshot of the backend ledger; replaced wholesale on import/fetch
    CREATE TABLE IF NOT EXISTS ledger_records(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_number TEXT NOT NULL,
        project_name TEXT NOT NULL,
        task_number TEXT,
        category TEXT,
        budget TEXT NOT NULL,
        expense TEXT NOT NULL,
        encumbrance TEXT NOT NULL,
        balance TEXT NOT NULL,
        award_start_date TEXT,
        award_end_date TEXT,
        project_status TEXT,
        pi_id TEXT,
        pi_name TEXT,
        pm_id TEXT,
        pm_name TEXT,
        co_pi_names TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_ledger_project ON ledger_records(project_number);

    CREATE TABLE IF NOT EXISTS personnel_records(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id TEXT NOT NULL,
        name TEXT NOT NULL,
        position TEXT NOT NULL,
        monthly_rate TEXT NOT NULL,
        benefit_rate TEXT NOT NULL,
        distribution_percent TEXT NOT NULL,
        funding_end_date TEXT,
        project_number TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_personnel_employee ON personnel_records(employee_id);
    "#,
    )?;
    Ok(())
}

fn dec(s: String, what: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' in snapshot", what, s))
}

pub fn replace_ledger(conn: &mut Connection, records: &[LedgerRecord]) -> Result<usize> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM ledger_records", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO ledger_records(project_number, project_name, task_number, category, \
             budget, expense, encumbrance, balance, award_start_date, award_end_date, \
             project_status, pi_id, pi_name, pm_id, pm_name, co_pi_names) \
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16)",
        )?;
        for r in records {
            stmt.execute(params![
                r.project_number,
                r.project_name,
                r.task_number,
                r.category,
                r.budget.to_string(),
                r.expense.to_string(),
                r.encumbrance.to_string(),
                r.balance.to_string(),
                r.award_start_date,
                r.award_end_date,
                r.project_status,
                r.pi_id,
                r.pi_name,
                r.pm_id,
                r.pm_name,
                r.co_pi_names,
            ])?;
        }
    }
    tx.commit()?;
    log::info!("stored {} ledger records", records.len());
    Ok(records.len())
}

pub fn load_ledger(conn: &Connection) -> Result<Vec<LedgerRecord>> {
    let mut stmt = conn.prepare(
        "SELECT project_number, project_name, task_number, category, budget, expense, \
         encumbrance, balance, award_start_date, award_end_date, project_status, pi_id, \
         pi_name, pm_id, pm_name, co_pi_names FROM ledger_records ORDER BY id",
    )?;
    let mut cur = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = cur.next()? {
        out.push(LedgerRecord {
            project_number: r.get(0)?,
            project_name: r.get(1)?,
            task_number: r.get(2)?,
            category: r.get(3)?,
            budget: dec(r.get(4)?, "budget")?,
            expense: dec(r.get(5)?, "expense")?,
            encumbrance: dec(r.get(6)?, "encumbrance")?,
            balance: dec(r.get(7)?, "balance")?,
            award_start_date: r.get(8)?,
            award_end_date: r.get(9)?,
            project_status: r.get(10)?,
            pi_id: r.get(11)?,
            pi_name: r.get(12)?,
            pm_id: r.get(13)?,
            pm_name: r.get(14)?,
            co_pi_names: r.get(15)?,
        });
    }
    log::debug!("loaded {} ledger records", out.len());
    Ok(out)
}

pub fn replace_personnel(conn: &mut Connection, records: &[PersonnelRecord]) -> Result<usize> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM personnel_records", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO personnel_records(employee_id, name, position, monthly_rate, \
             benefit_rate, distribution_percent, funding_end_date, project_number) \
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
        )?;
        for r in records {
            stmt.execute(params![
                r.employee_id,
                r.name,
                r.position,
                r.monthly_rate.to_string(),
                r.benefit_rate.to_string(),
                r.distribution_percent.to_string(),
                r.funding_end_date,
                r.project_number,
            ])?;
        }
    }
    tx.commit()?;
    log::info!("stored {} personnel records", records.len());
    Ok(records.len())
}

pub fn load_personnel(conn: &Connection) -> Result<Vec<PersonnelRecord>> {
    let mut stmt = conn.prepare(
        "SELECT employee_id, name, position, monthly_rate, benefit_rate, distribution_percent, \
         funding_end_date, project_number FROM personnel_records ORDER BY id",
    )?;
    let mut cur = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = cur.next()? {
        out.push(PersonnelRecord {
            employee_id: r.get(0)?,
            name: r.get(1)?,
            position: r.get(2)?,
            monthly_rate: dec(r.get(3)?, "monthly rate")?,
            benefit_rate: dec(r.get(4)?, "benefit rate")?,
            distribution_percent: dec(r.get(5)?, "distribution percent")?,
            funding_end_date: r.get(6)?,
            project_number: r.get(7)?,
        });
    }
    log::debug!("loaded {} personnel records", out.len());
    Ok(out)
}
