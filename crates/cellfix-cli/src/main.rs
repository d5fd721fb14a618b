//! cellfix - writes the formatted-text fixture workbook
//!
//! Builds the fixed catalog into `TestFiles/FormattedTextTest.xlsx` (the
//! directory must already exist), reads the file back to check it, and
//! prints what was written. Log verbosity follows `RUST_LOG`.

use anyhow::{Context, Result};
use cellfix::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let catalog = Catalog::formatted_text();
    let builder = WorkbookBuilder::new(BuildOptions::default());

    let report = builder
        .build(&catalog, DEFAULT_OUTPUT_PATH)
        .with_context(|| format!("Failed to build {}", DEFAULT_OUTPUT_PATH))?;

    let verified = verify(&catalog, &report.path, &report.sheet_title)
        .with_context(|| format!("Fixture check failed for {}", report.path.display()))?;
    info!(cases = verified.cases_checked, "fixture verified");

    print!("{}", report);
    Ok(())
}
