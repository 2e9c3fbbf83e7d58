use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use crate::report::FormattedReport;

/// Spreadsheet column labels, in output order.
const HEADERS: [&str; 11] = [
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
    "Adult Available",
];

/// Write a formatted report to a single-worksheet xlsx file: bold header row,
/// one row per report row, counts as numbers and currency as text.
pub fn write_xlsx(report: &FormattedReport, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Med to Rec")?;

    let header_format = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &header_format)?;
    }

    for (idx, row) in report.rows.iter().enumerate() {
        let line = (idx + 1) as u32;
        worksheet.write(line, 0, row.brand.as_str())?;
        worksheet.write(line, 1, row.product_type.as_str())?;
        worksheet.write(line, 2, row.subtype.as_str())?;
        worksheet.write(line, 3, row.product_name.as_str())?;
        worksheet.write(line, 4, row.amount.as_str())?;
        worksheet.write(line, 5, row.unit_of_measure.as_str())?;
        worksheet.write(line, 6, row.location.as_str())?;
        worksheet.write(line, 7, row.available)?;
        worksheet.write(line, 8, row.unit_cost.as_str())?;
        worksheet.write(line, 9, row.total_cost.as_str())?;
        if let Some(adult) = row.adult_available {
            worksheet.write(line, 10, adult)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to write spreadsheet to {}", path.display()))?;
    debug!(rows = report.rows.len(), path = %path.display(), "spreadsheet written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{InventoryRecord, MEDICAL_LOCATION};
    use crate::report::ReportBuilder;

    #[test]
    fn writes_a_nonempty_workbook() {
        let records = vec![InventoryRecord {
            brand: "Coastal".into(),
            product_type: "FLOWER".into(),
            subtype: Some("Indica".into()),
            product_name: "Sunset Sherbet".into(),
            amount: "3.5".into(),
            unit_of_measure: "g".into(),
            location: MEDICAL_LOCATION.into(),
            available: 10,
            unit_cost: 11.0,
            total_cost: 110.0,
        }];
        let report = ReportBuilder::new().build_formatted(&records);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("med_to_rec.xlsx");
        write_xlsx(&report, &path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn empty_report_still_produces_a_header_only_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        write_xlsx(&FormattedReport::default(), &path).unwrap();
        assert!(path.exists());
    }
}
