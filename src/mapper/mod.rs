//! Row mapper: spreadsheet files ↔ ordered records
//!
//! - Import: first sheet → header labels renamed through a [`FieldMap`]
//! - Export: records → header row of display names + one row per record

mod rows;

pub use rows::{build_table, map_rows};

use crate::config::{ImportOptions, StyleSpec};
use crate::error::{SheetError, SheetResult};
use crate::response::ResponseSink;
use crate::types::{FieldMap, FileFormat, RawTable, Record, RecordSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where an export goes
pub enum Destination<'a> {
    /// A file on disk, created or truncated
    File(PathBuf),
    /// A direct-output response; see [`crate::response::prepare_download`]
    Sink(&'a mut dyn ResponseSink),
}

impl From<&Path> for Destination<'_> {
    fn from(path: &Path) -> Self {
        Destination::File(path.to_path_buf())
    }
}

impl From<PathBuf> for Destination<'_> {
    fn from(path: PathBuf) -> Self {
        Destination::File(path)
    }
}

impl From<&PathBuf> for Destination<'_> {
    fn from(path: &PathBuf) -> Self {
        Destination::File(path.clone())
    }
}

impl From<&str> for Destination<'_> {
    fn from(path: &str) -> Self {
        Destination::File(PathBuf::from(path))
    }
}

impl<'a, S: ResponseSink> From<&'a mut S> for Destination<'a> {
    fn from(sink: &'a mut S) -> Self {
        Destination::Sink(sink)
    }
}

/// Importer for one spreadsheet file
pub struct RowImporter {
    path: PathBuf,
    format: FileFormat,
    options: ImportOptions,
}

impl RowImporter {
    pub fn new<P: AsRef<Path>>(path: P, format: FileFormat) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format,
            options: ImportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn skip_empty_rows(mut self, skip: bool) -> Self {
        self.options.skip_empty_rows = skip;
        self
    }

    /// Read the first sheet without any field mapping
    pub fn read_table(&self) -> SheetResult<RawTable> {
        if !self.path.is_file() {
            return Err(SheetError::not_found(&self.path));
        }
        self.format.backend().read_table(&self.path)
    }

    /// Import records, renaming header labels through `field_map`
    pub fn import(&self, field_map: &FieldMap) -> SheetResult<RecordSet> {
        debug!(
            "Importing {} as {} with {} mapped fields",
            self.path.display(),
            self.format,
            field_map.len()
        );

        let table = self.read_table()?;
        let records = map_rows(&table, field_map, &self.options);

        info!(
            "Imported {} records from {} ({} data rows)",
            records.len(),
            self.path.display(),
            table.rows.len()
        );
        Ok(records)
    }
}

/// Exporter writing records under a fixed header map
pub struct RowExporter {
    format: FileFormat,
    header_map: FieldMap,
    style: StyleSpec,
}

impl RowExporter {
    pub fn new(format: FileFormat, header_map: FieldMap) -> Self {
        Self {
            format,
            header_map,
            style: StyleSpec::default(),
        }
    }

    /// Styling for xlsx/xls output; ignored for csv
    pub fn with_style(mut self, style: StyleSpec) -> Self {
        self.style = style;
        self
    }

    /// Write the header row and one row per record to `destination`.
    ///
    /// When the destination is a [`ResponseSink`] and anything fails, the
    /// sink's headers are reset to a readable error page before the error is
    /// returned.
    pub fn export<'a>(
        &self,
        destination: impl Into<Destination<'a>>,
        records: &[Record],
    ) -> SheetResult<()> {
        let backend = self.format.backend();
        let table = build_table(&self.header_map, records);

        match destination.into() {
            Destination::File(path) => {
                debug!(
                    "Exporting {} records to {} as {}",
                    records.len(),
                    path.display(),
                    self.format
                );
                backend.write_file(&path, &table, &self.style)?;
                info!("Exported {} records to {}", records.len(), path.display());
                Ok(())
            }
            Destination::Sink(sink) => {
                debug!(
                    "Exporting {} records to response as {}",
                    records.len(),
                    self.format
                );
                let result = backend.render(&table, &self.style).and_then(|bytes| {
                    sink.write_body(&bytes).map_err(|e| {
                        SheetError::Write(format!("Failed to write response body: {}", e))
                    })
                });

                match result {
                    Ok(()) => {
                        info!("Exported {} records to response", records.len());
                        Ok(())
                    }
                    Err(err) => {
                        warn!("Export to response failed, resetting headers: {}", err);
                        sink.reset_for_error();
                        Err(err)
                    }
                }
            }
        }
    }
}

/// Import records from the first sheet of `path`.
///
/// Header labels found in `field_map` are renamed to its values; other
/// columns are dropped. See [`RowImporter`] for finer control.
pub fn import<P: AsRef<Path>>(
    path: P,
    format: FileFormat,
    field_map: &FieldMap,
    skip_empty_rows: bool,
) -> SheetResult<RecordSet> {
    RowImporter::new(path, format)
        .skip_empty_rows(skip_empty_rows)
        .import(field_map)
}

/// Export `records` with columns (and display headers) taken from `header_map`
pub fn export<'a>(
    destination: impl Into<Destination<'a>>,
    format: FileFormat,
    header_map: &FieldMap,
    records: &[Record],
    style: &StyleSpec,
) -> SheetResult<()> {
    RowExporter::new(format, header_map.clone())
        .with_style(style.clone())
        .export(destination, records)
}
