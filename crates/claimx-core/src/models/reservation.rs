//! Reservation and expense data models.
//!
//! Extraction produces the loosely typed [`ExtractedReservation`]; the
//! pipeline turns it into a [`ProcessedReservation`] with defaults applied
//! and tax figures derived.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cost centre substituted when a fragment carries none.
pub const UNKNOWN_COST_CENTRE: &str = "UNKNOWN";

/// One decoded `<expense>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExpenseFragment {
    /// Cost centre code, e.g. `DEV632`.
    pub cost_centre: Option<String>,

    /// Total amount including tax. `None` when absent or unparsable.
    pub total: Option<Decimal>,

    /// Payment method, e.g. `personal card`.
    pub payment_method: Option<String>,
}

impl RawExpenseFragment {
    /// Whether this fragment carries a strictly positive total.
    pub fn has_positive_total(&self) -> bool {
        self.total.is_some_and(|total| total > Decimal::ZERO)
    }
}

/// Everything the extractor found in a piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedReservation {
    /// Raw inner text of the first `<vendor>` tag.
    pub vendor: Option<String>,

    /// Raw inner text of the first `<description>` tag.
    pub description: Option<String>,

    /// Date from the first `<date>` tag, when it has the `27 April 2022` shape.
    pub date: Option<NaiveDate>,

    /// Expense blocks in the order they appear.
    pub expense_fragments: Vec<RawExpenseFragment>,
}

impl ExtractedReservation {
    /// Whether at least one fragment can be claimed.
    pub fn has_usable_expense(&self) -> bool {
        self.expense_fragments.iter().any(RawExpenseFragment::has_positive_total)
    }
}

/// An expense line with defaults applied and tax split out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedExpenseLine {
    /// Cost centre, never empty.
    pub cost_centre: String,

    /// Total including tax, as found in the text.
    pub total_including_tax: Option<Decimal>,

    /// Total minus tax.
    pub total_excluding_tax: Option<Decimal>,

    /// Tax amount.
    pub tax: Option<Decimal>,

    /// Payment method, as found in the text.
    pub payment_method: Option<String>,
}

/// Final output of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedReservation {
    /// Vendor from the inline `<vendor>` tag.
    pub vendor: Option<String>,

    /// Description from the inline `<description>` tag.
    pub description: Option<String>,

    /// Date from the inline `<date>` tag, if it parsed.
    pub date: Option<NaiveDate>,

    /// One line per expense fragment, same order.
    pub expense_lines: Vec<ProcessedExpenseLine>,
}

impl ProcessedReservation {
    /// Sum of all known totals including tax.
    pub fn total_including_tax(&self) -> Decimal {
        self.expense_lines
            .iter()
            .filter_map(|line| line.total_including_tax)
            .sum()
    }

    /// Sum of all computed tax amounts.
    pub fn total_tax(&self) -> Decimal {
        self.expense_lines.iter().filter_map(|line| line.tax).sum()
    }
}
