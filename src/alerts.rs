// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::summarize_projects;
use crate::models::{Alert, AlertKind, ManagedPi, PiAlert, ProjectSummary, Severity};
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

/// Remaining balance below this share of budget raises a low-budget warning.
pub const LOW_BUDGET_RATIO: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
pub const ENDING_SOON_MONTHS: u32 = 3;
pub const MAX_PI_ALERTS: usize = 3;

fn alert(kind: AlertKind, severity: Severity, summary: &ProjectSummary, message: String) -> Alert {
    Alert {
        id: format!("{}-{}", kind, summary.project_number),
        message,
        severity,
        kind,
        project_number: summary.project_number.clone(),
    }
}

/// Threshold checks for one project, budget alert first, then the date alert.
pub fn alerts_for_project(summary: &ProjectSummary, prefix: &str, today: NaiveDate) -> Vec<Alert> {
    let mut out = Vec::new();
    let t = &summary.totals;
    let label = format!("{} {}", prefix, summary.project_number);
    let label = label.trim();

    if t.balance < Decimal::ZERO {
        out.push(alert(
            AlertKind::NegativeBalance,
            Severity::Error,
            summary,
            format!("{} has a negative balance of {:.2}", label, t.balance),
        ));
    } else if t.budget > Decimal::ZERO
        && t.balance > Decimal::ZERO
        && t
            .balance
            .checked_div(t.budget)
            .is_some_and(|ratio| ratio < LOW_BUDGET_RATIO)
    {
        out.push(alert(
            AlertKind::LowBudget,
            Severity::Warning,
            summary,
            format!(
                "{} has less than 10% of its budget remaining ({:.2} of {:.2})",
                label, t.balance, t.budget
            ),
        ));
    }

    if let Some(end) = summary
        .end_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    {
        let horizon = today
            .checked_add_months(Months::new(ENDING_SOON_MONTHS))
            .unwrap_or(NaiveDate::MAX);
        if end > today && end <= horizon {
            out.push(alert(
                AlertKind::EndingSoon,
                Severity::Warning,
                summary,
                format!("{} ends on {}", label, end),
            ));
        }
    }

    log::debug!(
        "project {}: {} alert(s)",
        summary.project_number,
        out.len()
    );
    out
}

/// Alerts across every project of every managed PI: errors first, then lowest
/// balance, capped at `MAX_PI_ALERTS`.
pub fn pi_project_alerts(managed: &[ManagedPi], today: NaiveDate) -> Vec<PiAlert> {
    let mut all = Vec::new();
    for pi in managed {
        for summary in summarize_projects(&pi.records) {
            for a in alerts_for_project(&summary, &pi.name, today) {
                all.push(PiAlert {
                    alert: a,
                    pi_id: pi.pi_id.clone(),
                    balance: summary.totals.balance,
                });
            }
        }
    }
    all.sort_by(|a, b| {
        a.alert
            .severity
            .cmp(&b.alert.severity)
            .then(a.balance.cmp(&b.balance))
    });
    all.truncate(MAX_PI_ALERTS);
    all
}
