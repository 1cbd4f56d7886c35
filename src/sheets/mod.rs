//! Spreadsheet summaries.
//!
//! Both parsers are pure functions over rows of cell text, as exported from
//! the organization's budget sheet:
//!
//! - [`budget`]: the expense breakdown and its totals
//! - [`membership`]: member counts by category

pub mod budget;
pub mod membership;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::Validate;

pub use budget::{parse_budget, BudgetSummary, DueSummary};
pub use membership::{parse_membership, MembershipSummary};

/// Payload of the sheet summary routes: rows of cells, top to bottom.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetRows {
    /// Cells as text; numbers and booleans are rendered, `null` is empty.
    #[serde(deserialize_with = "deserialize_rows")]
    pub rows: Vec<Vec<String>>,
}

impl Validate for SheetRows {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Cell `index` of `row`, trimmed; empty when the row is short.
pub(crate) fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", |c| c.trim())
}

fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn deserialize_rows<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Vec::<Option<Vec<Value>>>::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|row| row.unwrap_or_default().into_iter().map(cell_text).collect())
        .collect())
}
