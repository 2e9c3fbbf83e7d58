use serde::{Deserialize, Serialize};

use crate::inventory::{ADULT_USE_LOCATION, MEDICAL_LOCATION};

pub mod builder;

pub use builder::ReportBuilder;

/// Adult-use on-hand count at or below which a medical SKU is flagged for
/// transfer. Every call site goes through [`ReportConfig`]; the literal lives
/// here and nowhere else.
pub const DEFAULT_ADULT_USE_CUTOFF: i64 = 5;

/// Brand marker on the synthetic totals row appended to formatted reports.
/// Consumers must exclude rows carrying it from per-item statistics.
pub const TOTAL_BRAND: &str = "TOTAL";

/// Tunable inputs of the report transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Transfer cutoff, inclusive.
    pub adult_use_cutoff: i64,
    pub medical_location: String,
    pub adult_use_location: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            adult_use_cutoff: DEFAULT_ADULT_USE_CUTOFF,
            medical_location: MEDICAL_LOCATION.to_string(),
            adult_use_location: ADULT_USE_LOCATION.to_string(),
        }
    }
}

/// One qualifying medical-location SKU, carrying its inventory attributes plus
/// the summed adult-use availability for the same SKU key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub brand: String,
    pub product_type: String,
    pub subtype: Option<String>,
    pub product_name: String,
    pub amount: String,
    pub unit_of_measure: String,
    pub location: String,
    pub available: i64,
    pub unit_cost: f64,
    pub total_cost: f64,
    /// Summed adult-use stock sharing this row's SKU key; zero when the key
    /// has no adult-use counterpart.
    pub adult_available: i64,
}

/// Unformatted report: numeric currency, no totals row. The variant served to
/// programmatic consumers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferReport {
    pub rows: Vec<ReportRow>,
}

impl TransferReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Total units flagged for transfer.
    pub fn total_units(&self) -> i64 {
        self.rows.iter().map(|row| row.available).sum()
    }
}

/// Document-facing row: currency rendered as `$`-prefixed strings, missing
/// subtype rendered blank. The totals row leaves `adult_available` unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedRow {
    pub brand: String,
    pub product_type: String,
    pub subtype: String,
    pub product_name: String,
    pub amount: String,
    pub unit_of_measure: String,
    pub location: String,
    pub available: i64,
    pub unit_cost: String,
    pub total_cost: String,
    pub adult_available: Option<i64>,
}

/// Formatted report: currency strings plus a trailing totals row. The variant
/// served to the console and spreadsheet paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormattedReport {
    pub rows: Vec<FormattedRow>,
}

impl FormattedReport {
    /// Rows describing actual SKUs, totals excluded.
    pub fn data_rows(&self) -> impl Iterator<Item = &FormattedRow> {
        self.rows.iter().filter(|row| row.brand != TOTAL_BRAND)
    }

    /// The trailing totals row, when the report is non-empty.
    pub fn totals_row(&self) -> Option<&FormattedRow> {
        self.rows.last().filter(|row| row.brand == TOTAL_BRAND)
    }
}
