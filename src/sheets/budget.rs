//! Expense breakdown of the budget sheet.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use tracing::debug;

use super::cell;
use crate::models::request::parse_amount;

/// Header that opens the expense section.
pub const EXPENSE_SECTION_HEADER: &str = "expense breakdown";

/// Row label that closes the expense section.
pub const GRAND_TOTAL_LABEL: &str = "grand total";

/// Expense excluded from `expensesWithoutNationals`.
pub const NATIONALS_LABEL: &str = "Nationals";

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid regex")
});

/// Dues summary block. Only `availableFunds` is derived from the sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub brother_dues: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pledge_dues: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub national_fees_brothers: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub national_fees_pledges: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub difference: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub previous_budget: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub available_funds: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub remainder: Decimal,
}

/// Parsed expense breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub due_summary: DueSummary,
    /// One entry per distinct label, in first-seen order; a repeated label
    /// keeps its last amount.
    #[serde(serialize_with = "serialize_expenses")]
    pub expenses: Vec<(String, Decimal)>,
    /// Every accepted row's label, repeats included.
    pub expense_labels: Vec<String>,
    /// Every accepted row's amount, aligned with `expense_labels`.
    #[serde(serialize_with = "serialize_amounts")]
    pub expense_values: Vec<Decimal>,
    /// Sum of `expenses`, rounded to a whole amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    /// `total_expenses` minus the Nationals expense, rounded.
    #[serde(with = "rust_decimal::serde::float")]
    pub expenses_without_nationals: Decimal,
}

/// Summarize the expense section of a budget sheet.
///
/// Scanning starts after the first row whose first cell contains
/// "Expense Breakdown" and stops at the first row labelled "Grand Total"
/// (both case-insensitive). A row counts when it has a label and an amount
/// that parses to a positive number once `$` and `,` are stripped.
pub fn parse_budget(rows: &[Vec<String>]) -> BudgetSummary {
    let mut summary = BudgetSummary::default();
    let mut in_section = false;

    for (index, row) in rows.iter().enumerate() {
        let label = cell(row, 0);
        let raw_amount = cell(row, 1);
        let lowered = label.to_lowercase();

        if !in_section {
            if lowered.contains(EXPENSE_SECTION_HEADER) {
                debug!(row = index + 1, "Found expense section");
                in_section = true;
            }
            continue;
        }

        if lowered.contains(GRAND_TOTAL_LABEL) {
            debug!(row = index + 1, "Reached grand total");
            break;
        }

        if label.is_empty() || raw_amount.is_empty() {
            continue;
        }

        match sheet_amount(raw_amount) {
            Some(amount) if amount > Decimal::ZERO => {
                match summary.expenses.iter_mut().find(|(name, _)| name.as_str() == label) {
                    Some(entry) => entry.1 = amount,
                    None => summary.expenses.push((label.to_string(), amount)),
                }
                summary.expense_labels.push(label.to_string());
                summary.expense_values.push(amount);
            }
            _ => debug!(label, raw_amount, "Skipped row without a positive amount"),
        }
    }

    let total: Decimal = summary.expenses.iter().map(|(_, amount)| *amount).sum();
    let nationals = summary
        .expenses
        .iter()
        .find(|(name, _)| name.as_str() == NATIONALS_LABEL)
        .map_or(Decimal::ZERO, |(_, amount)| *amount);

    summary.total_expenses = round_whole(total);
    summary.expenses_without_nationals = round_whole(total - nationals);
    summary.due_summary.available_funds = summary.total_expenses;
    summary
}

/// Parse the leading number of a currency cell such as `$1,250.00`.
fn sheet_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    let number = LEADING_NUMBER.find(cleaned.trim_start())?;
    parse_amount(number.as_str()).ok()
}

fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn to_float(value: &Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

fn serialize_expenses<S>(expenses: &[(String, Decimal)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(expenses.iter().map(|(name, amount)| (name, to_float(amount))))
}

fn serialize_amounts<S>(amounts: &[Decimal], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(amounts.iter().map(to_float))
}
