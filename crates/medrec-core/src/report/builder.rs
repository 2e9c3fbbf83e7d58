use std::collections::HashMap;

use tracing::{debug, instrument};

use super::{FormattedReport, FormattedRow, ReportConfig, ReportRow, TransferReport, TOTAL_BRAND};
use crate::inventory::InventoryRecord;

/// Builds Med to Rec transfer reports from a point-in-time inventory export.
///
/// Pure transformation: the input is only borrowed, no state survives a call,
/// and a single builder is safe to share across concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    config: ReportConfig,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::with_config(ReportConfig::default())
    }

    pub fn with_config(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Unformatted variant: numeric currency, no totals row.
    #[instrument(name = "build_report", skip(self, records), fields(record_count = records.len()))]
    pub fn build(&self, records: &[InventoryRecord]) -> TransferReport {
        TransferReport {
            rows: self.qualifying_rows(records).unwrap_or_default(),
        }
    }

    /// Formatted variant: currency strings plus a trailing totals row.
    ///
    /// An export with no medical rows yields an empty report with no totals
    /// row; a medical subset whose rows are all above the cutoff still gets
    /// one (`available` 0, `total_cost` `$0.00`).
    #[instrument(name = "build_formatted_report", skip(self, records), fields(record_count = records.len()))]
    pub fn build_formatted(&self, records: &[InventoryRecord]) -> FormattedReport {
        let Some(rows) = self.qualifying_rows(records) else {
            return FormattedReport::default();
        };

        let mut formatted: Vec<FormattedRow> = rows.iter().map(format_row).collect();
        let total_units: i64 = formatted.iter().map(|row| row.available).sum();
        // The grand total sums the already-rounded currency strings, so the
        // totals row reproduces exactly what the columns above it show.
        let total_cost: f64 = formatted.iter().map(|row| currency_value(&row.total_cost)).sum();
        formatted.push(totals_row(total_units, total_cost));

        FormattedReport { rows: formatted }
    }

    /// Steps shared by both variants: partition by location, aggregate
    /// adult-use stock per SKU key, left-join onto the medical subset, filter
    /// by the cutoff, sort. Returns `None` when the export has no medical
    /// rows at all.
    fn qualifying_rows(&self, records: &[InventoryRecord]) -> Option<Vec<ReportRow>> {
        let mut medical = Vec::new();
        let mut adult_counts: HashMap<String, i64> = HashMap::new();
        for record in records {
            if record.location == self.config.medical_location {
                medical.push(record);
            } else if record.location == self.config.adult_use_location {
                *adult_counts.entry(record.sku_key()).or_insert(0) += record.available;
            }
            // Stock in any other location never reaches the report.
        }

        if medical.is_empty() {
            return None;
        }

        let mut rows: Vec<ReportRow> = medical
            .into_iter()
            .filter_map(|record| {
                let adult_available = adult_counts
                    .get(&record.sku_key())
                    .copied()
                    .unwrap_or(0);
                (adult_available <= self.config.adult_use_cutoff).then(|| ReportRow {
                    brand: record.brand.clone(),
                    product_type: record.product_type.clone(),
                    subtype: record.subtype.clone(),
                    product_name: record.product_name.clone(),
                    amount: record.amount.clone(),
                    unit_of_measure: record.unit_of_measure.clone(),
                    location: record.location.clone(),
                    available: record.available,
                    unit_cost: record.unit_cost,
                    total_cost: record.total_cost,
                    adult_available,
                })
            })
            .collect();

        // Stable sort: full ties keep their post-join relative order.
        rows.sort_by(|a, b| {
            (&a.product_type, &a.brand, &a.product_name)
                .cmp(&(&b.product_type, &b.brand, &b.product_name))
        });

        debug!(qualifying = rows.len(), "transfer report built");
        Some(rows)
    }
}

fn format_row(row: &ReportRow) -> FormattedRow {
    FormattedRow {
        brand: row.brand.clone(),
        product_type: row.product_type.clone(),
        subtype: row.subtype.clone().unwrap_or_default(),
        product_name: row.product_name.clone(),
        amount: row.amount.clone(),
        unit_of_measure: row.unit_of_measure.clone(),
        location: row.location.clone(),
        available: row.available,
        unit_cost: format_currency(row.unit_cost),
        total_cost: format_currency(row.total_cost),
        adult_available: Some(row.adult_available),
    }
}

fn totals_row(total_units: i64, total_cost: f64) -> FormattedRow {
    FormattedRow {
        brand: TOTAL_BRAND.to_string(),
        product_type: String::new(),
        subtype: String::new(),
        product_name: String::new(),
        amount: String::new(),
        unit_of_measure: String::new(),
        location: String::new(),
        available: total_units,
        unit_cost: String::new(),
        total_cost: format_currency_grouped(total_cost),
        adult_available: None,
    }
}

/// Per-row currency rendering: `$1234.56`.
pub(crate) fn format_currency(value: f64) -> String {
    format!("${value:.2}")
}

/// Totals-row currency rendering with a thousands separator: `$1,234,567.89`.
pub(crate) fn format_currency_grouped(value: f64) -> String {
    let plain = format!("{:.2}", value.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

/// Numeric value of a `$`/`,`-formatted currency string.
fn currency_value(formatted: &str) -> f64 {
    formatted
        .chars()
        .filter(|ch| *ch != '$' && *ch != ',')
        .collect::<String>()
        .parse()
        .unwrap_or(0.0)
}
