// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Grouping and totaling of ledger and personnel rows into view models.
//!
//! Everything here is pure: inputs are borrowed, outputs are freshly built,
//! and no function fails. "Not found" is `None`.

use crate::models::{
    AggregatedEmployee, CategoryTotal, LedgerRecord, PersonnelRecord, PositionSummary,
    ProjectSummary, Totals,
};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet, hash_map::Entry};

pub const UNKNOWN_CATEGORY: &str = "Unknown";
pub const ALL_PROJECTS_NUMBER: &str = "All";
pub const ALL_PROJECTS_NAME: &str = "All Projects";
pub const MULTIPLE: &str = "Multiple";

const MONTHS_PER_YEAR: i64 = 12;

/// Group items by key, keeping groups and their members in first-seen order.
pub fn group_by<'a, T, K, F>(items: &'a [T], key: F) -> Vec<(K, Vec<&'a T>)>
where
    K: Eq + std::hash::Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&T>)> = Vec::new();
    for item in items {
        let k = key(item);
        match index.entry(k.clone()) {
            Entry::Occupied(e) => groups[*e.get()].1.push(item),
            Entry::Vacant(e) => {
                e.insert(groups.len());
                groups.push((k, vec![item]));
            }
        }
    }
    groups
}

pub fn category_name(r: &LedgerRecord) -> &str {
    match r.category.as_deref() {
        Some(c) if !c.trim().is_empty() => c,
        _ => UNKNOWN_CATEGORY,
    }
}

/// Sum the four money fields over a set of rows.
pub fn total<'a, I>(records: I) -> Totals
where
    I: IntoIterator<Item = &'a LedgerRecord>,
{
    let mut t = Totals::default();
    for r in records {
        t.add_record(r);
    }
    t
}

/// Per-category totals in first-appearance order.
pub fn category_totals<'a, I>(records: I) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a LedgerRecord>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<CategoryTotal> = Vec::new();
    for r in records {
        let name = category_name(r);
        let i = match index.get(name) {
            Some(i) => *i,
            None => {
                index.insert(name.to_string(), out.len());
                out.push(CategoryTotal {
                    category: name.to_string(),
                    totals: Totals::default(),
                });
                out.len() - 1
            }
        };
        out[i].totals.add_record(r);
    }
    out
}

/// Totals per project number, in first-appearance order.
pub fn project_totals(records: &[LedgerRecord]) -> Vec<(String, Totals)> {
    group_by(records, |r| r.project_number.clone())
        .into_iter()
        .map(|(k, rows)| (k, total(rows)))
        .collect()
}

fn dates<'a, F>(records: &[&'a LedgerRecord], field: F) -> Vec<&'a str>
where
    F: Fn(&'a LedgerRecord) -> Option<&'a str>,
{
    records
        .iter()
        .filter_map(|r| field(*r))
        .filter(|d| !d.is_empty())
        .collect()
}

/// Lexically smallest non-empty date. Valid for zero-padded `YYYY-MM-DD`.
pub fn earliest_date<'a, F>(records: &[&'a LedgerRecord], field: F) -> Option<String>
where
    F: Fn(&'a LedgerRecord) -> Option<&'a str>,
{
    dates(records, field).into_iter().min().map(str::to_string)
}

/// Lexically largest non-empty date.
pub fn latest_date<'a, F>(records: &[&'a LedgerRecord], field: F) -> Option<String>
where
    F: Fn(&'a LedgerRecord) -> Option<&'a str>,
{
    dates(records, field).into_iter().max().map(str::to_string)
}

fn assemble(rows: &[&LedgerRecord]) -> Option<ProjectSummary> {
    // Descriptive fields are taken from the first row as-is.
    let first = rows.first()?;
    Some(ProjectSummary {
        project_number: first.project_number.clone(),
        project_name: first.project_name.clone(),
        start_date: earliest_date(rows, |r| r.award_start_date.as_deref()),
        end_date: latest_date(rows, |r| r.award_end_date.as_deref()),
        status: first.project_status.clone(),
        pi_id: first.pi_id.clone(),
        pi_name: first.pi_name.clone(),
        pm_name: first.pm_name.clone(),
        co_pi_names: first.co_pi_names.clone(),
        categories: category_totals(rows.iter().copied()),
        totals: total(rows.iter().copied()),
    })
}

pub fn summarize_project_by_number(
    records: &[LedgerRecord],
    project_number: &str,
) -> Option<ProjectSummary> {
    let rows: Vec<&LedgerRecord> = records
        .iter()
        .filter(|r| r.project_number == project_number)
        .collect();
    let summary = assemble(&rows);
    log::debug!(
        "project {}: {} ledger rows, found={}",
        project_number,
        rows.len(),
        summary.is_some()
    );
    summary
}

/// Roll every row into one summary with placeholder descriptive fields.
pub fn summarize_all_projects(records: &[LedgerRecord]) -> Option<ProjectSummary> {
    let rows: Vec<&LedgerRecord> = records.iter().collect();
    let mut summary = assemble(&rows)?;
    summary.project_number = ALL_PROJECTS_NUMBER.to_string();
    summary.project_name = ALL_PROJECTS_NAME.to_string();
    summary.status = None;
    summary.pi_id = None;
    summary.pi_name = Some(MULTIPLE.to_string());
    summary.pm_name = Some(MULTIPLE.to_string());
    summary.co_pi_names = None;
    Some(summary)
}

/// One summary per distinct project number, in first-appearance order.
pub fn summarize_projects(records: &[LedgerRecord]) -> Vec<ProjectSummary> {
    let out: Vec<ProjectSummary> = group_by(records, |r| r.project_number.clone())
        .into_iter()
        .filter_map(|(_, rows)| assemble(&rows))
        .collect();
    log::debug!("summarized {} rows into {} projects", records.len(), out.len());
    out
}

pub fn personnel_for_project<'a>(
    records: &'a [PersonnelRecord],
    project_number: &str,
) -> Vec<&'a PersonnelRecord> {
    records
        .iter()
        .filter(|r| r.project_number == project_number)
        .collect()
}

fn position_summary(rows: &[&PersonnelRecord]) -> Option<PositionSummary> {
    let first = rows.first()?;
    let annual_salary = first
        .monthly_rate
        .saturating_mul(Decimal::from(MONTHS_PER_YEAR));
    let mut projects: Vec<String> = Vec::new();
    let mut distribution = Decimal::ZERO;
    for r in rows {
        distribution = distribution.saturating_add(r.distribution_percent);
        if !projects.contains(&r.project_number) {
            projects.push(r.project_number.clone());
        }
    }
    Some(PositionSummary {
        position: first.position.clone(),
        monthly_rate: first.monthly_rate,
        benefit_rate: first.benefit_rate,
        annual_salary,
        annual_fringe: annual_salary.saturating_mul(first.benefit_rate),
        distribution_percent: distribution,
        projects,
    })
}

/// Group distributions by employee. A position funded from several projects
/// contributes its salary once.
pub fn aggregate_employees(records: &[PersonnelRecord]) -> Vec<AggregatedEmployee> {
    let mut out = Vec::new();
    for (employee_id, rows) in group_by(records, |r| r.employee_id.clone()) {
        let mut positions = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for (_, position_rows) in group_by(&rows, |r| r.position.clone()) {
            let position_rows: Vec<&PersonnelRecord> =
                position_rows.into_iter().copied().collect();
            if let Some(p) = position_summary(&position_rows) {
                positions.push(p);
            }
        }
        for r in &rows {
            seen.insert(r.project_number.as_str());
        }
        let annual_salary = positions
            .iter()
            .fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.annual_salary));
        let annual_fringe = positions
            .iter()
            .fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.annual_fringe));
        out.push(AggregatedEmployee {
            name: rows[0].name.clone(),
            employee_id,
            project_count: seen.len(),
            positions,
            annual_salary,
            annual_fringe,
        });
    }
    out
}
