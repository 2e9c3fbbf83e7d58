use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use medrec_core::{export, inventory, render, InventoryError, ReportBuilder};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "medrec-cli",
    author,
    version,
    about = "Med to Rec inventory transfer report"
)]
struct Cli {
    /// Inventory valuation CSV export
    #[arg(value_name = "INVENTORY_CSV")]
    input: PathBuf,

    /// Also write the formatted report to a spreadsheet
    #[arg(short, long, value_name = "XLSX")]
    output: Option<PathBuf>,

    /// Emit the unformatted report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", describe(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let records = inventory::load_inventory_file(&cli.input)?;
    let builder = ReportBuilder::new();

    if cli.json {
        let report = builder.build(&records);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let report = builder.build_formatted(&records);
    if let Some(path) = &cli.output {
        export::write_xlsx(&report, path)
            .with_context(|| format!("failed to export spreadsheet to {}", path.display()))?;
        println!("Report exported to {}", path.display());
    }
    print!("{}", render::render_human(&report)?);
    Ok(())
}

/// Friendly messages for the failures an operator can fix themselves;
/// everything else falls back to the error chain.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<InventoryError>() {
        Some(InventoryError::Io { path, source }) if source.kind() == ErrorKind::NotFound => {
            format!(
                "Error: file '{}' not found. Check the path and try again.",
                path.display()
            )
        }
        Some(InventoryError::MissingColumn(column)) => format!(
            "Error: missing required column `{column}`. \
             Make sure this is an inventory valuation export with all required columns."
        ),
        _ => format!("Error: {err:#}"),
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();
}
