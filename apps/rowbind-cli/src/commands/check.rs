use crate::{
    config::{load_binder, ConfigOverrides},
    error::{CliError, CliResult},
};
use rowbind_core::{BindingReader, CsvError};
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of checking every row of a CSV file
#[derive(Debug, Default)]
pub struct CheckReport {
    pub total: usize,
    /// (line, message) for each rejected row
    pub failures: Vec<(u64, String)>,
}

pub fn check_file(
    shape_path: &Path,
    csv_path: &Path,
    overrides: &ConfigOverrides,
) -> CliResult<CheckReport> {
    let binder = load_binder(shape_path, overrides)?;
    let mut reader = BindingReader::from_path(csv_path, binder)?;
    let mut report = CheckReport::default();

    for result in reader.records() {
        report.total += 1;
        match result {
            Ok(_) => {}
            Err(CsvError::Decode { line, source }) => {
                report.failures.push((line, source.to_string()));
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(
        rows = report.total,
        failed = report.failures.len(),
        "csv check finished"
    );
    Ok(report)
}

pub fn execute(shape_path: PathBuf, csv_path: PathBuf, overrides: ConfigOverrides) -> CliResult<()> {
    println!("Checking {} against {}", csv_path.display(), shape_path.display());

    let report = check_file(&shape_path, &csv_path, &overrides)?;

    for (line, message) in &report.failures {
        println!("  line {}: {}", line, message);
    }

    if !report.failures.is_empty() {
        return Err(CliError::RowsRejected {
            failed: report.failures.len(),
            total: report.total,
        });
    }

    println!("Header OK, {} rows decoded", report.total);
    Ok(())
}
