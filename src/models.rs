// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::RecordError;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::AddAssign;

/// One ledger row: a (project, task, expenditure category) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub project_number: String,
    pub project_name: String,
    pub task_number: Option<String>,
    pub category: Option<String>,
    pub budget: Decimal,
    pub expense: Decimal,
    pub encumbrance: Decimal,
    pub balance: Decimal,
    pub award_start_date: Option<String>,
    pub award_end_date: Option<String>,
    pub project_status: Option<String>,
    pub pi_id: Option<String>,
    pub pi_name: Option<String>,
    pub pm_id: Option<String>,
    pub pm_name: Option<String>,
    pub co_pi_names: Option<String>,
}

/// One personnel funding distribution: (employee, position, project).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonnelRecord {
    pub employee_id: String,
    pub name: String,
    pub position: String,
    pub monthly_rate: Decimal,
    /// Composite benefit rate as a fraction (0.31 = 31%).
    pub benefit_rate: Decimal,
    /// Share of the position funded by `project_number`, 0-100.
    pub distribution_percent: Decimal,
    pub funding_end_date: Option<String>,
    pub project_number: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub budget: Decimal,
    pub expense: Decimal,
    pub encumbrance: Decimal,
    pub balance: Decimal,
}

impl Totals {
    pub fn add_record(&mut self, r: &LedgerRecord) {
        *self += Totals {
            budget: r.budget,
            expense: r.expense,
            encumbrance: r.encumbrance,
            balance: r.balance,
        };
    }
}

/// Saturates at `Decimal::MAX`/`MIN` instead of panicking on overflow.
impl AddAssign for Totals {
    fn add_assign(&mut self, rhs: Totals) {
        self.budget = self.budget.saturating_add(rhs.budget);
        self.expense = self.expense.saturating_add(rhs.expense);
        self.encumbrance = self.encumbrance.saturating_add(rhs.encumbrance);
        self.balance = self.balance.saturating_add(rhs.balance);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub totals: Totals,
}

/// Per-project view model, rebuilt from ledger records on every use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project_number: String,
    pub project_name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
    pub pi_id: Option<String>,
    pub pi_name: Option<String>,
    pub pm_name: Option<String>,
    pub co_pi_names: Option<String>,
    pub categories: Vec<CategoryTotal>,
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSummary {
    pub position: String,
    pub monthly_rate: Decimal,
    pub benefit_rate: Decimal,
    pub annual_salary: Decimal,
    pub annual_fringe: Decimal,
    pub distribution_percent: Decimal,
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedEmployee {
    pub employee_id: String,
    pub name: String,
    pub positions: Vec<PositionSummary>,
    pub project_count: usize,
    pub annual_salary: Decimal,
    pub annual_fringe: Decimal,
}

/// Ordered so that `Error` sorts before `Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    NegativeBalance,
    LowBudget,
    EndingSoon,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::NegativeBalance => "negative-balance",
            AlertKind::LowBudget => "low-budget",
            AlertKind::EndingSoon => "ending-soon",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub message: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub project_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiAlert {
    #[serde(flatten)]
    pub alert: Alert,
    pub pi_id: String,
    pub balance: Decimal,
}

/// A principal investigator under supervision, with their projects' ledger rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedPi {
    pub pi_id: String,
    pub name: String,
    pub records: Vec<LedgerRecord>,
}

/// Amount as received from the backend or a file: JSON number or text, kept
/// as its literal digits until parsed into a `Decimal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountText(pub String);

impl<'de> Deserialize<'de> for AmountText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl<'de> Visitor<'de> for AmountVisitor {
            type Value = AmountText;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or numeric string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(AmountText(v.trim().to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(AmountText(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(AmountText(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(AmountText(v.to_string()))
            }

            // serde_json with `arbitrary_precision` hands a number over as a
            // one-entry map holding its literal digits.
            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                match map.next_entry::<String, String>()? {
                    Some((_, digits)) => Ok(AmountText(digits)),
                    None => Err(de::Error::invalid_length(0, &self)),
                }
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

fn amount(
    row: usize,
    field: &'static str,
    raw: Option<AmountText>,
) -> Result<Option<Decimal>, RecordError> {
    match raw {
        None => Ok(None),
        Some(AmountText(s)) if s.is_empty() => Ok(None),
        Some(AmountText(s)) => {
            let cleaned = s.replace(',', "");
            cleaned
                .parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(&cleaned))
                .map(Some)
                .map_err(|_| RecordError::InvalidAmount {
                    row,
                    field,
                    value: s,
                })
        }
    }
}

fn text(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Ledger row as delivered by the backend API or a CSV/JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerRow {
    #[serde(default, alias = "projectNumber")]
    pub project_number: Option<String>,
    #[serde(default, alias = "projectName")]
    pub project_name: Option<String>,
    #[serde(default, alias = "taskNumber")]
    pub task_number: Option<String>,
    #[serde(default, alias = "categoryName", alias = "expenditureCategory")]
    pub category: Option<String>,
    #[serde(default)]
    pub budget: Option<AmountText>,
    #[serde(default, alias = "expenses")]
    pub expense: Option<AmountText>,
    #[serde(default, alias = "commitments")]
    pub encumbrance: Option<AmountText>,
    #[serde(default)]
    pub balance: Option<AmountText>,
    #[serde(default, alias = "awardStartDate")]
    pub award_start_date: Option<String>,
    #[serde(default, alias = "awardEndDate")]
    pub award_end_date: Option<String>,
    #[serde(default, alias = "projectStatus")]
    pub project_status: Option<String>,
    #[serde(default, alias = "piId")]
    pub pi_id: Option<String>,
    #[serde(default, alias = "piName")]
    pub pi_name: Option<String>,
    #[serde(default, alias = "pmId")]
    pub pm_id: Option<String>,
    #[serde(default, alias = "pmName")]
    pub pm_name: Option<String>,
    #[serde(default, alias = "coPiNames")]
    pub co_pi_names: Option<String>,
}

impl LedgerRow {
    /// Validate into a typed record. `row` is 1-based and only used in errors.
    /// A missing balance is derived as budget - expense - encumbrance.
    pub fn into_record(self, row: usize) -> Result<LedgerRecord, RecordError> {
        let project_number = text(self.project_number).ok_or(RecordError::MissingField {
            row,
            field: "project_number",
        })?;
        let budget = amount(row, "budget", self.budget)?.unwrap_or_default();
        let expense = amount(row, "expense", self.expense)?.unwrap_or_default();
        let encumbrance = amount(row, "encumbrance", self.encumbrance)?.unwrap_or_default();
        let balance = amount(row, "balance", self.balance)?
            .unwrap_or_else(|| budget.saturating_sub(expense).saturating_sub(encumbrance));
        Ok(LedgerRecord {
            project_name: text(self.project_name).unwrap_or_else(|| project_number.clone()),
            project_number,
            task_number: text(self.task_number),
            category: text(self.category),
            budget,
            expense,
            encumbrance,
            balance,
            award_start_date: text(self.award_start_date),
            award_end_date: text(self.award_end_date),
            project_status: text(self.project_status),
            pi_id: text(self.pi_id),
            pi_name: text(self.pi_name),
            pm_id: text(self.pm_id),
            pm_name: text(self.pm_name),
            co_pi_names: text(self.co_pi_names),
        })
    }
}

/// Personnel distribution row as delivered by the backend API or a file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonnelRow {
    #[serde(default, alias = "employeeId")]
    pub employee_id: Option<String>,
    #[serde(default, alias = "employeeName")]
    pub name: Option<String>,
    #[serde(default, alias = "positionDescription")]
    pub position: Option<String>,
    #[serde(default, alias = "monthlyRate")]
    pub monthly_rate: Option<AmountText>,
    #[serde(default, alias = "compositeBenefitRate")]
    pub benefit_rate: Option<AmountText>,
    #[serde(default, alias = "distributionPercent")]
    pub distribution_percent: Option<AmountText>,
    #[serde(default, alias = "fundingEndDate")]
    pub funding_end_date: Option<String>,
    #[serde(default, alias = "projectNumber")]
    pub project_number: Option<String>,
}

impl PersonnelRow {
    pub fn into_record(self, row: usize) -> Result<PersonnelRecord, RecordError> {
        let employee_id = text(self.employee_id).ok_or(RecordError::MissingField {
            row,
            field: "employee_id",
        })?;
        let project_number = text(self.project_number).ok_or(RecordError::MissingField {
            row,
            field: "project_number",
        })?;
        Ok(PersonnelRecord {
            name: text(self.name).unwrap_or_else(|| employee_id.clone()),
            employee_id,
            position: text(self.position).unwrap_or_else(|| "Unknown".to_string()),
            monthly_rate: amount(row, "monthly_rate", self.monthly_rate)?.unwrap_or_default(),
            benefit_rate: amount(row, "benefit_rate", self.benefit_rate)?.unwrap_or_default(),
            distribution_percent: amount(row, "distribution_percent", self.distribution_percent)?
                .unwrap_or_default(),
            funding_end_date: text(self.funding_end_date),
            project_number,
        })
    }
}
