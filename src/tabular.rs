// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{AggregatedEmployee, LedgerRecord, PersonnelRecord, ProjectSummary};
use anyhow::{Context, Result, anyhow};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use regex::RegexBuilder;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

pub const UTF8_BOM: &str = "\u{feff}";

/// Rows that carry an optional end date.
pub trait EndDated {
    fn end_date(&self) -> Option<&str>;
}

impl EndDated for ProjectSummary {
    fn end_date(&self) -> Option<&str> {
        self.end_date.as_deref()
    }
}

impl EndDated for LedgerRecord {
    fn end_date(&self) -> Option<&str> {
        self.award_end_date.as_deref()
    }
}

impl EndDated for PersonnelRecord {
    fn end_date(&self) -> Option<&str> {
        self.funding_end_date.as_deref()
    }
}

/// Ascending by end date. Rows with no end date come first ("no deadline").
pub fn sort_by_end_date<T: EndDated>(rows: &mut [T]) {
    rows.sort_by(|a, b| a.end_date().cmp(&b.end_date()));
}

/// Case-insensitive literal match on number, name, PI and PM.
pub fn filter_projects<'a>(rows: &'a [ProjectSummary], query: &str) -> Vec<&'a ProjectSummary> {
    let q = query.trim();
    if q.is_empty() {
        return rows.iter().collect();
    }
    let re = match RegexBuilder::new(&regex::escape(q))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };
    rows.iter()
        .filter(|p| {
            re.is_match(&p.project_number)
                || re.is_match(&p.project_name)
                || p.pi_name.as_deref().is_some_and(|s| re.is_match(s))
                || p.pm_name.as_deref().is_some_and(|s| re.is_match(s))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeSort {
    Name,
    Salary,
    Projects,
}

impl FromStr for EmployeeSort {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(EmployeeSort::Name),
            "salary" => Ok(EmployeeSort::Salary),
            "projects" => Ok(EmployeeSort::Projects),
            other => Err(anyhow!(
                "Unknown sort key '{}' (use name|salary|projects)",
                other
            )),
        }
    }
}

pub fn sort_employees(rows: &mut [AggregatedEmployee], key: EmployeeSort, descending: bool) {
    rows.sort_by(|a, b| {
        let ord = match key {
            EmployeeSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            EmployeeSort::Salary => a.annual_salary.cmp(&b.annual_salary),
            EmployeeSort::Projects => a.project_count.cmp(&b.project_count),
        };
        if descending { ord.reverse() } else { ord }
    });
}

/// One CSV column: header label and the field it reads. Dotted keys reach
/// into nested objects (`totals.balance`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column<'a> {
    pub key: &'a str,
    pub header: &'a str,
}

pub const PROJECT_COLUMNS: &[Column<'static>] = &[
    Column { key: "project_number", header: "Project" },
    Column { key: "project_name", header: "Name" },
    Column { key: "pi_name", header: "PI" },
    Column { key: "pm_name", header: "PM" },
    Column { key: "status", header: "Status" },
    Column { key: "start_date", header: "Start" },
    Column { key: "end_date", header: "End" },
    Column { key: "totals.budget", header: "Budget" },
    Column { key: "totals.expense", header: "Expense" },
    Column { key: "totals.encumbrance", header: "Encumbrance" },
    Column { key: "totals.balance", header: "Balance" },
];

pub const EMPLOYEE_COLUMNS: &[Column<'static>] = &[
    Column { key: "employee_id", header: "Employee ID" },
    Column { key: "name", header: "Name" },
    Column { key: "project_count", header: "Projects" },
    Column { key: "annual_salary", header: "Annual Salary" },
    Column { key: "annual_fringe", header: "Annual Fringe" },
];

pub const ALERT_COLUMNS: &[Column<'static>] = &[
    Column { key: "id", header: "ID" },
    Column { key: "severity", header: "Severity" },
    Column { key: "type", header: "Type" },
    Column { key: "project_number", header: "Project" },
    Column { key: "message", header: "Message" },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    /// CRLF output is prefixed with a UTF-8 BOM for spreadsheet imports.
    CrLf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub header: bool,
    pub line_ending: LineEnding,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            header: true,
            line_ending: LineEnding::Lf,
        }
    }
}

fn lookup<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    key.split('.').try_fold(value, |v, part| v.get(part))
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// One CSV line without its terminator. A lone empty field stays an empty
/// line rather than the `""` the writer emits for it.
fn csv_line<I, S>(fields: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let fields: Vec<S> = fields.into_iter().collect();
    if fields.len() == 1 && fields[0].as_ref().is_empty() {
        return Ok(String::new());
    }
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());
    wtr.write_record(&fields)?;
    let bytes = wtr.into_inner().map_err(|e| anyhow!("Flush CSV: {}", e))?;
    let mut line = String::from_utf8(bytes).context("CSV output is not UTF-8")?;
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(line)
}

/// Render rows as CSV text, without a trailing line terminator.
pub fn to_csv<T: Serialize>(rows: &[T], columns: &[Column<'_>], opts: CsvOptions) -> Result<String> {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    if opts.header {
        lines.push(csv_line(columns.iter().map(|c| c.header))?);
    }
    for row in rows {
        let v = serde_json::to_value(row).context("Serialize CSV row")?;
        lines.push(csv_line(columns.iter().map(|c| cell(lookup(&v, c.key))))?);
    }
    let text = match opts.line_ending {
        LineEnding::Lf => lines.join("\n"),
        LineEnding::CrLf => format!("{}{}", UTF8_BOM, lines.join("\r\n")),
    };
    Ok(text)
}
