use std::fmt::Write;

use crate::report::{FormattedReport, FormattedRow};

const BRAND_WIDTH: usize = 20;
const TYPE_WIDTH: usize = 15;
const NAME_WIDTH: usize = 40;
const RULE_WIDTH: usize = 112;

/// Render a formatted report as a fixed-width console table with a summary
/// header. Pure string construction; the caller owns printing and timestamps.
pub fn render_human(report: &FormattedReport) -> anyhow::Result<String> {
    let mut out = String::new();
    let data_rows: Vec<&FormattedRow> = report.data_rows().collect();
    let totals = report.totals_row();

    if data_rows.is_empty() && totals.is_none() {
        writeln!(out, "No medical-location stock in this export; nothing to report.")?;
        return Ok(out);
    }

    writeln!(out, "Items needing transfer: {}", data_rows.len())?;
    if let Some(totals) = totals {
        writeln!(out, "Total units to transfer: {}", totals.available)?;
        writeln!(out, "Total value: {}", totals.total_cost)?;
    }
    writeln!(out)?;

    if data_rows.is_empty() {
        writeln!(
            out,
            "No items need transfer; every medical SKU has adult-use stock above the cutoff."
        )?;
        return Ok(out);
    }

    writeln!(
        out,
        "{:<bw$} {:<tw$} {:<nw$} {:>9} {:>11} {:>12}",
        "BRAND",
        "PRODUCT TYPE",
        "PRODUCT NAME",
        "MED UNITS",
        "ADULT UNITS",
        "TOTAL COST",
        bw = BRAND_WIDTH,
        tw = TYPE_WIDTH,
        nw = NAME_WIDTH,
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    for row in &data_rows {
        let adult = row
            .adult_available
            .map(|count| count.to_string())
            .unwrap_or_default();
        writeln!(
            out,
            "{:<bw$} {:<tw$} {:<nw$} {:>9} {:>11} {:>12}",
            truncate(&row.brand, BRAND_WIDTH),
            truncate(&row.product_type, TYPE_WIDTH),
            truncate(&row.product_name, NAME_WIDTH),
            row.available,
            adult,
            row.total_cost,
            bw = BRAND_WIDTH,
            tw = TYPE_WIDTH,
            nw = NAME_WIDTH,
        )?;
    }

    if let Some(totals) = totals {
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(
            out,
            "{:<bw$} {:<tw$} {:<nw$} {:>9} {:>11} {:>12}",
            totals.brand,
            "",
            "",
            totals.available,
            "",
            totals.total_cost,
            bw = BRAND_WIDTH,
            tw = TYPE_WIDTH,
            nw = NAME_WIDTH,
        )?;
    }

    Ok(out)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(2)).collect();
    format!("{cut}..")
}
