//! Membership structure table of the budget sheet.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::cell;

/// Header that opens the membership table.
pub const MEMBERSHIP_SECTION_HEADER: &str = "akpsi membership structure";

// "Brothers 42", "Pledges (12)", "Alumni - 1,024"
static TRAILING_COUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)[\s(\-]*\$?([0-9,]+)\)?$").expect("valid regex")
});

/// Member counts by category, in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MembershipSummary {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub total: u64,
}

/// Summarize the membership table of a budget sheet.
///
/// The table starts after the row whose first cell contains "AKPsi
/// Membership Structure" and ends at the first row with an empty first cell.
/// The count comes from the second cell, or from a number trailing the label
/// when the second cell is empty. Rows without a positive count are skipped.
pub fn parse_membership(rows: &[Vec<String>]) -> MembershipSummary {
    let mut summary = MembershipSummary::default();
    let mut in_section = false;

    for (index, row) in rows.iter().enumerate() {
        let first = cell(row, 0);
        let second = cell(row, 1);

        if !in_section {
            if first.to_lowercase().contains(MEMBERSHIP_SECTION_HEADER) {
                debug!(row = index + 1, "Found membership section");
                in_section = true;
            }
            continue;
        }

        if first.is_empty() {
            debug!(row = index + 1, "Membership section ended");
            break;
        }

        let (name, count_text) = match TRAILING_COUNT.captures(first) {
            Some(caps) if second.is_empty() => (
                caps.get(1).map_or("", |m| m.as_str().trim()),
                caps.get(2).map_or("", |m| m.as_str()),
            ),
            _ => (first, second),
        };
        let name = name.trim_end_matches([':', '\u{2014}', '-']).trim();

        match count(count_text) {
            0 => debug!(first, second, "Skipped row without a count"),
            value => {
                summary.labels.push(name.to_string());
                summary.values.push(value);
            }
        }
    }

    summary.total = summary.values.iter().sum();
    summary
}

/// Digits of `text` as a number; zero when there are none.
fn count(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}
