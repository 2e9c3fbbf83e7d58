pub mod export;
pub mod inventory;
pub mod render;
pub mod report;

pub use inventory::{
    load_inventory, load_inventory_file, InventoryError, InventoryRecord, ADULT_USE_LOCATION,
    MEDICAL_LOCATION, REQUIRED_COLUMNS,
};
pub use report::{
    FormattedReport, FormattedRow, ReportBuilder, ReportConfig, ReportRow, TransferReport,
    DEFAULT_ADULT_USE_CUTOFF, TOTAL_BRAND,
};
