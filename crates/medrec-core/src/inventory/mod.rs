use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod csv_loader;

pub use csv_loader::{load_inventory, load_inventory_file};

/// Facility name marking stock in the medical channel.
pub const MEDICAL_LOCATION: &str = "LIVE MEDICAL PRODUCTS";

/// Facility name marking stock in the adult-use channel.
pub const ADULT_USE_LOCATION: &str = "A. LIVE ADULT USE PRODUCTS";

/// Column headers an inventory valuation export must carry. Extra columns are
/// ignored; a missing one aborts the load before any row is read.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "Brand",
    "Product Type",
    "Subtype",
    "Product Name",
    "Amount",
    "Unit of Measure",
    "Location",
    "Available",
    "Unit Cost",
    "Total Cost",
];

/// One record per SKU-location combination in a point-in-time export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub brand: String,
    pub product_type: String,
    /// `None` when the source cell is empty; keyed as an empty string.
    pub subtype: Option<String>,
    pub product_name: String,
    /// Magnitude kept verbatim as text. It only ever participates in the SKU
    /// key as a string fragment, never in arithmetic.
    pub amount: String,
    pub unit_of_measure: String,
    /// Open set of facility names; only [`MEDICAL_LOCATION`] and
    /// [`ADULT_USE_LOCATION`] are significant to the report.
    pub location: String,
    pub available: i64,
    pub unit_cost: f64,
    pub total_cost: f64,
}

impl InventoryRecord {
    /// Matching key identifying one SKU across locations:
    /// `brand|type|subtype|name|amount<unit>`, with an empty string standing
    /// in for a missing subtype and no separator between amount and unit.
    pub fn sku_key(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}{}",
            self.brand,
            self.product_type,
            self.subtype.as_deref().unwrap_or(""),
            self.product_name,
            self.amount,
            self.unit_of_measure,
        )
    }
}

/// Errors raised while turning a delimited export into typed records.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("missing required column `{0}`")]
    MissingColumn(String),

    #[error("invalid `{column}` value `{value}` on line {line}")]
    InvalidValue {
        column: &'static str,
        line: u64,
        value: String,
    },

    #[error("failed to read inventory file at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed inventory data: {0}")]
    Csv(#[from] csv::Error),
}
