use crate::{
    config::{load_binder, ConfigOverrides},
    error::{CliError, CliResult},
};
use rowbind_core::{BindingReader, CsvError};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{info, warn};

/// Decode every row and write it as one JSON object per line.
///
/// Returns (written, skipped). With `skip_invalid` unset the first bad row
/// aborts the conversion.
pub fn convert<W: Write>(
    shape_path: &Path,
    csv_path: &Path,
    overrides: &ConfigOverrides,
    skip_invalid: bool,
    out: &mut W,
) -> CliResult<(usize, usize)> {
    let binder = load_binder(shape_path, overrides)?;
    let mut reader = BindingReader::from_path(csv_path, binder)?;
    let schema = reader.binder().schema().clone();

    let mut written = 0;
    let mut skipped = 0;
    for result in reader.records() {
        match result {
            Ok(record) => {
                serde_json::to_writer(&mut *out, &record.to_json(&schema)?)?;
                writeln!(out)?;
                written += 1;
            }
            Err(CsvError::Decode { line, source }) if skip_invalid => {
                warn!(line, error = %source, "skipping row");
                skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
    out.flush()?;

    info!(written, skipped, "csv converted");
    Ok((written, skipped))
}

pub fn execute(
    shape_path: PathBuf,
    csv_path: PathBuf,
    output: Option<PathBuf>,
    skip_invalid: bool,
    overrides: ConfigOverrides,
) -> CliResult<()> {
    let (written, skipped) = match &output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            convert(&shape_path, &csv_path, &overrides, skip_invalid, &mut out)?
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            convert(&shape_path, &csv_path, &overrides, skip_invalid, &mut out)?
        }
    };

    if let Some(path) = &output {
        println!("Wrote {} records to {}", written, path.display());
    }
    if skipped > 0 {
        return Err(CliError::RowsRejected {
            failed: skipped,
            total: written + skipped,
        });
    }
    Ok(())
}
