// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use walter::aggregate::{
    category_totals, earliest_date, latest_date, project_totals, summarize_all_projects,
    summarize_project_by_number, summarize_projects,
};
use walter::models::{LedgerRecord, Totals};

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn rec(project: &str, category: Option<&str>, budget: &str, expense: &str, enc: &str) -> LedgerRecord {
    let (b, e, n) = (d(budget), d(expense), d(enc));
    LedgerRecord {
        project_number: project.to_string(),
        project_name: format!("{} name", project),
        task_number: None,
        category: category.map(str::to_string),
        budget: b,
        expense: e,
        encumbrance: n,
        balance: b - e - n,
        award_start_date: None,
        award_end_date: None,
        project_status: Some("ACTIVE".into()),
        pi_id: Some("PI1".into()),
        pi_name: Some("Ada Lovelace".into()),
        pm_id: None,
        pm_name: Some("Grace Hopper".into()),
        co_pi_names: None,
    }
}

fn sample() -> Vec<LedgerRecord> {
    vec![
        rec("P-100", Some("Salaries"), "10000.00", "2500.25", "100.10"),
        rec("P-100", Some("Supplies"), "1500.50", "300.00", "0"),
        rec("P-200", Some("Travel"), "800", "900", "0"),
        rec("P-100", None, "250", "12.34", "5"),
        rec("P-100", Some("Salaries"), "5000", "1000", "0"),
        rec("P-100", Some("  "), "1", "0", "0"),
    ]
}

#[test]
fn category_totals_add_up_to_grand_total() {
    let records = sample();
    let s = summarize_project_by_number(&records, "P-100").unwrap();
    let mut sum = Totals::default();
    for c in &s.categories {
        sum += c.totals;
    }
    assert_eq!(sum, s.totals);
    assert_eq!(s.totals.budget, d("16751.50"));
    assert_eq!(s.totals.expense, d("3812.59"));
    assert_eq!(s.totals.encumbrance, d("105.10"));
    assert_eq!(s.totals.balance, d("12833.81"));
}

#[test]
fn categories_keep_first_seen_order_and_unknown_bucket() {
    let records = sample();
    let s = summarize_project_by_number(&records, "P-100").unwrap();
    let names: Vec<&str> = s.categories.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(names, ["Salaries", "Supplies", "Unknown"]);
    assert_eq!(s.categories[0].totals.budget, d("15000"));
    assert_eq!(s.categories[2].totals.budget, d("251"));
}

#[test]
fn missing_project_is_none() {
    assert!(summarize_project_by_number(&[], "X").is_none());
    assert!(summarize_project_by_number(&sample(), "missing").is_none());
    assert!(summarize_all_projects(&[]).is_none());
}

#[test]
fn empty_input_groups_to_nothing() {
    assert!(summarize_projects(&[]).is_empty());
    assert!(project_totals(&[]).is_empty());
    assert!(category_totals(std::iter::empty::<&LedgerRecord>()).is_empty());
}

#[test]
fn descriptive_fields_come_from_first_row() {
    let mut records = sample();
    records[1].pi_name = Some("Someone Else".into());
    records[1].project_status = Some("CLOSED".into());
    let s = summarize_project_by_number(&records, "P-100").unwrap();
    assert_eq!(s.pi_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(s.status.as_deref(), Some("ACTIVE"));
    assert_eq!(s.pm_name.as_deref(), Some("Grace Hopper"));
}

#[test]
fn date_resolution_skips_nulls() {
    let mut records = sample();
    records[0].award_start_date = Some("2024-03-01".into());
    records[1].award_start_date = Some("2023-07-01".into());
    records[0].award_end_date = Some("2026-06-30".into());
    records[3].award_end_date = Some("2027-01-31".into());
    records[4].award_end_date = Some(String::new());

    let refs: Vec<&LedgerRecord> = records.iter().collect();
    assert_eq!(
        earliest_date(&refs, |r| r.award_start_date.as_deref()).as_deref(),
        Some("2023-07-01")
    );
    assert_eq!(
        latest_date(&refs, |r| r.award_end_date.as_deref()).as_deref(),
        Some("2027-01-31")
    );

    let untouched = sample();
    let refs: Vec<&LedgerRecord> = untouched.iter().collect();
    assert!(earliest_date(&refs, |r| r.award_start_date.as_deref()).is_none());
    assert!(latest_date(&refs, |r| r.award_end_date.as_deref()).is_none());

    let s = summarize_project_by_number(&records, "P-100").unwrap();
    assert_eq!(s.start_date.as_deref(), Some("2023-07-01"));
    assert_eq!(s.end_date.as_deref(), Some("2027-01-31"));
}

#[test]
fn all_projects_summary_uses_placeholders() {
    let records = sample();
    let all = summarize_all_projects(&records).unwrap();
    assert_eq!(all.project_name, "All Projects");
    assert_eq!(all.pi_name.as_deref(), Some("Multiple"));
    assert_eq!(all.pm_name.as_deref(), Some("Multiple"));
    assert!(all.status.is_none());

    let per_project: Vec<_> = project_totals(&records);
    let mut sum = Totals::default();
    for (_, t) in &per_project {
        sum += *t;
    }
    assert_eq!(sum, all.totals);
}

#[test]
fn summarize_projects_one_per_project_in_input_order() {
    let summaries = summarize_projects(&sample());
    let numbers: Vec<&str> = summaries.iter().map(|s| s.project_number.as_str()).collect();
    assert_eq!(numbers, ["P-100", "P-200"]);
    assert_eq!(summaries[1].totals.balance, d("-100"));
}

#[test]
fn totals_saturate_instead_of_overflowing() {
    let records = vec![
        rec("P-1", None, "79228162514264337593543950335", "0", "0"),
        rec("P-1", None, "79228162514264337593543950335", "0", "0"),
    ];
    let s = summarize_project_by_number(&records, "P-1").unwrap();
    assert_eq!(s.totals.budget, Decimal::MAX);
    assert_eq!(s.totals.balance, Decimal::MAX);
}
