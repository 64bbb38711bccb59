//! CSV backend
//!
//! Comma delimited, double-quote escaped, first line is the header. Styling
//! does not apply to this format.

use crate::backend::TabularBackend;
use crate::config::StyleSpec;
use crate::error::{SheetError, SheetResult};
use crate::types::{CellValue, FileFormat, RawTable};
use csv::{ReaderBuilder, Writer, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

const UTF8_BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvBackend;

impl TabularBackend for CsvBackend {
    fn format(&self) -> FileFormat {
        FileFormat::Csv
    }

    fn read_table(&self, path: &Path) -> SheetResult<RawTable> {
        let file = File::open(path).map_err(|e| {
            debug!("Failed to open {}: {}", path.display(), e);
            SheetError::not_found(path)
        })?;
        parse_csv(file)
    }

    fn write_file(&self, path: &Path, table: &RawTable, _style: &StyleSpec) -> SheetResult<()> {
        let mut writer = WriterBuilder::new()
            .from_path(path)
            .map_err(|e| SheetError::Write(format!("Failed to create {}: {}", path.display(), e)))?;
        write_csv(&mut writer, table)
    }

    fn render(&self, table: &RawTable, _style: &StyleSpec) -> SheetResult<Vec<u8>> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        write_csv(&mut writer, table)?;
        writer
            .into_inner()
            .map_err(|e| SheetError::Write(format!("Failed to finish CSV: {}", e)))
    }
}

fn parse_csv<R: Read>(source: R) -> SheetResult<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // Row widths are reconciled by the mapper
        .from_reader(source);

    let mut records = reader.records();
    let headers = match records.next() {
        None => return Ok(RawTable::default()),
        Some(first) => first
            .map_err(|e| SheetError::Parse(format!("Failed to read CSV header: {}", e)))?
            .iter()
            .enumerate()
            .map(|(idx, label)| {
                if idx == 0 {
                    label.trim_start_matches(UTF8_BOM).to_string()
                } else {
                    label.to_string()
                }
            })
            .collect(),
    };

    let mut table = RawTable::new(headers);
    for (idx, record) in records.enumerate() {
        let record = record.map_err(|e| {
            SheetError::Parse(format!("Failed to parse CSV row {}: {}", idx + 2, e))
        })?;
        table.push_row(record.iter().map(CellValue::from).collect());
    }

    debug!(
        "Read CSV with {} columns and {} data rows",
        table.width(),
        table.rows.len()
    );
    Ok(table)
}

fn write_csv<W: Write>(writer: &mut Writer<W>, table: &RawTable) -> SheetResult<()> {
    writer
        .write_record(&table.headers)
        .map_err(|e| SheetError::Write(format!("Failed to write CSV header: {}", e)))?;

    for row in &table.rows {
        writer
            .write_record(row.iter().map(|value| value.to_string()))
            .map_err(|e| SheetError::Write(format!("Failed to write CSV row: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| SheetError::Write(format!("Failed to flush CSV: {}", e)))
}
