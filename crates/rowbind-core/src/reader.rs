/*!
# CSV Reading

Drives a [`RecordBinder`] from a `csv::Reader`: the first row is reconciled as
the header, every following row is decoded into a record.
*/

use crate::{
    binder::{Record, RecordBinder, Tabular},
    config::BinderConfig,
    errors::{CsvError, CsvResult},
};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::{fs::File, io, path::Path};
use tracing::{debug, info};

/// A CSV reader whose header has been reconciled against a binder.
pub struct BindingReader<R, Rd> {
    reader: Reader<Rd>,
    binder: RecordBinder<R>,
}

impl<R: Record, Rd: io::Read> BindingReader<R, Rd> {
    /// Wrap `reader` and reconcile its header row with `binder`.
    ///
    /// Build `reader` with `flexible(true)` to have short or long rows
    /// reported per row by the binder instead of by the tokenizer.
    pub fn new(mut reader: Reader<Rd>, mut binder: RecordBinder<R>) -> CsvResult<Self> {
        let header = reader.headers()?;
        let columns: Vec<&str> = header.iter().collect();
        binder.reconcile_header(columns.as_slice())?;
        debug!(columns = columns.len(), "csv header accepted");

        Ok(Self { reader, binder })
    }

    pub fn from_reader(rdr: Rd, binder: RecordBinder<R>) -> CsvResult<Self> {
        let reader = ReaderBuilder::new().flexible(true).from_reader(rdr);
        Self::new(reader, binder)
    }

    pub fn binder(&self) -> &RecordBinder<R> {
        &self.binder
    }

    /// Decode the remaining rows, one result per row.
    ///
    /// A row that fails to decode does not end the iteration.
    pub fn records(&mut self) -> impl Iterator<Item = CsvResult<R>> + '_ {
        let binder = &self.binder;
        self.reader
            .records()
            .map(move |result| decode_record(binder, &result?))
    }
}

impl<R: Record> BindingReader<R, File> {
    pub fn from_path<P: AsRef<Path>>(path: P, binder: RecordBinder<R>) -> CsvResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, binder)
    }
}

fn decode_record<R: Record>(binder: &RecordBinder<R>, record: &StringRecord) -> CsvResult<R> {
    let line = record.position().map_or(0, |position| position.line());
    let cells: Vec<&str> = record.iter().collect();
    binder
        .new_record(cells.as_slice())
        .map_err(|source| CsvError::Decode { line, source })
}

/// Read every row of the CSV file at `path` into records of type `R`.
///
/// Stops at the first row that fails.
pub fn read_records<R: Tabular, P: AsRef<Path>>(path: P, config: BinderConfig) -> CsvResult<Vec<R>> {
    let path = path.as_ref();
    let binder = RecordBinder::<R>::for_record(config)?;
    let mut reader = BindingReader::from_path(path, binder)?;

    let rows = reader.records().collect::<CsvResult<Vec<R>>>()?;
    info!(path = %path.display(), rows = rows.len(), "csv records read");
    Ok(rows)
}
