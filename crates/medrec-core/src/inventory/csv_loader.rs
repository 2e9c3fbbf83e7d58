use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use super::{InventoryError, InventoryRecord};

/// Resolved positions of the required columns within the header row.
///
/// Exports from the point-of-sale system carry many more columns than the
/// report needs; resolving indices up front projects the input down to the
/// required ten and rejects a missing header before any row is read.
struct ColumnIndex {
    brand: usize,
    product_type: usize,
    subtype: usize,
    product_name: usize,
    amount: usize,
    unit_of_measure: usize,
    location: usize,
    available: usize,
    unit_cost: usize,
    total_cost: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, InventoryError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or_else(|| InventoryError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            brand: find("Brand")?,
            product_type: find("Product Type")?,
            subtype: find("Subtype")?,
            product_name: find("Product Name")?,
            amount: find("Amount")?,
            unit_of_measure: find("Unit of Measure")?,
            location: find("Location")?,
            available: find("Available")?,
            unit_cost: find("Unit Cost")?,
            total_cost: find("Total Cost")?,
        })
    }

    fn record_from(&self, row: &StringRecord, line: u64) -> Result<InventoryRecord, InventoryError> {
        let text = |idx: usize| row.get(idx).unwrap_or("").to_string();
        let subtype = match row.get(self.subtype).unwrap_or("") {
            "" => None,
            value => Some(value.to_string()),
        };
        Ok(InventoryRecord {
            brand: text(self.brand),
            product_type: text(self.product_type),
            subtype,
            product_name: text(self.product_name),
            amount: text(self.amount),
            unit_of_measure: text(self.unit_of_measure),
            location: text(self.location),
            available: parse_count(row.get(self.available).unwrap_or(""), line)?,
            unit_cost: parse_currency("Unit Cost", row.get(self.unit_cost).unwrap_or(""), line)?,
            total_cost: parse_currency("Total Cost", row.get(self.total_cost).unwrap_or(""), line)?,
        })
    }
}

/// Parse a delimited inventory export into typed records.
///
/// The header row is mandatory. Extra columns are dropped; a missing required
/// column yields [`InventoryError::MissingColumn`] naming it. Empty numeric
/// cells flow through as zero; non-numeric ones are an error.
pub fn load_inventory<R: Read>(reader: R) -> Result<Vec<InventoryRecord>, InventoryError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let line = row.position().map(|pos| pos.line()).unwrap_or(0);
        records.push(columns.record_from(&row, line)?);
    }
    debug!(count = records.len(), "inventory export loaded");
    Ok(records)
}

/// Load an inventory export from disk.
pub fn load_inventory_file(path: impl AsRef<Path>) -> Result<Vec<InventoryRecord>, InventoryError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| InventoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_inventory(file)
}

fn parse_count(value: &str, line: u64) -> Result<i64, InventoryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    if let Ok(count) = trimmed.parse::<i64>() {
        return Ok(count);
    }
    // Some exports serialize counts as floats ("12.0").
    trimmed
        .parse::<f64>()
        .map(|count| count as i64)
        .map_err(|_| InventoryError::InvalidValue {
            column: "Available",
            line,
            value: value.to_string(),
        })
}

fn parse_currency(column: &'static str, value: &str, line: u64) -> Result<f64, InventoryError> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|ch| *ch != '$' && *ch != ',')
        .collect();
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    cleaned
        .parse::<f64>()
        .map_err(|_| InventoryError::InvalidValue {
            column,
            line,
            value: value.to_string(),
        })
}
