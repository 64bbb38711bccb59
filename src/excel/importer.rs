//! Excel importer implementation - first worksheet (.xlsx / .xls) → RawTable

use crate::error::{SheetError, SheetResult};
use crate::types::{CellValue, RawTable};
use calamine::{Data, Range, Reader, Xls, Xlsx};
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

type Source = Cursor<Vec<u8>>;

/// Local file header signature of a ZIP (and therefore OOXML) container
const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";

/// Read the first sheet of an .xlsx workbook
pub(crate) fn read_xlsx(path: &Path) -> SheetResult<RawTable> {
    let bytes = read_bytes(path)?;
    load_xlsx(bytes, "xlsx")
}

/// Read the first sheet of an .xls workbook
///
/// OOXML content saved under an .xls name (what our own xls export writes)
/// goes through the xlsx reader.
pub(crate) fn read_xls(path: &Path) -> SheetResult<RawTable> {
    let bytes = read_bytes(path)?;
    if bytes.starts_with(ZIP_SIGNATURE) {
        debug!("{} carries an OOXML payload, reading as xlsx", path.display());
        return load_xlsx(bytes, "xls");
    }
    let mut workbook = open::<Xls<Source>>(bytes, "xls")?;
    let Some((_, range)) = first_sheet(&mut workbook)? else {
        return Ok(RawTable::default());
    };
    Ok(table_from_range(&range, None))
}

fn read_bytes(path: &Path) -> SheetResult<Vec<u8>> {
    fs::read(path).map_err(|e| {
        debug!("Failed to read {}: {}", path.display(), e);
        SheetError::not_found(path)
    })
}

/// OOXML workbooks declare their used area in `<dimension>`, which also
/// covers formatted blank cells that calamine leaves out of the range.
fn load_xlsx(bytes: Vec<u8>, label: &str) -> SheetResult<RawTable> {
    let mut workbook = open::<Xlsx<Source>>(bytes, label)?;
    let Some((sheet_name, range)) = first_sheet(&mut workbook)? else {
        return Ok(RawTable::default());
    };

    let declared_end = workbook
        .worksheet_cells_reader(&sheet_name)
        .map(|reader| reader.dimensions().end)
        .map_err(|e| {
            SheetError::Parse(format!("Failed to read sheet '{}': {}", sheet_name, e))
        })?;

    Ok(table_from_range(&range, Some(declared_end)))
}

fn open<R>(bytes: Vec<u8>, label: &str) -> SheetResult<R>
where
    R: Reader<Source>,
    R::Error: fmt::Display,
{
    R::new(Cursor::new(bytes))
        .map_err(|e| SheetError::Parse(format!("Failed to open {} workbook: {}", label, e)))
}

/// Only the first worksheet is imported
fn first_sheet<R>(workbook: &mut R) -> SheetResult<Option<(String, Range<Data>)>>
where
    R: Reader<Source>,
    R::Error: fmt::Display,
{
    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Ok(None);
    };

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        SheetError::Parse(format!("Failed to read sheet '{}': {}", sheet_name, e))
    })?;

    Ok(Some((sheet_name, range)))
}

/// Convert a worksheet range into header + rows.
///
/// calamine ranges start at the first populated cell, so cells are addressed
/// absolutely: row 1 is always the header and column A always column 1.
/// `declared_end` extends the table past the last valued cell, so trailing
/// rows that hold only blanks are still read.
fn table_from_range(range: &Range<Data>, declared_end: Option<(u32, u32)>) -> RawTable {
    let Some((mut last_row, mut last_col)) = range.end() else {
        return RawTable::default();
    };
    if let Some((row, col)) = declared_end {
        last_row = last_row.max(row);
        last_col = last_col.max(col);
    }

    let cell = |row: u32, col: u32| -> CellValue {
        range
            .get_value((row, col))
            .map(CellValue::from)
            .unwrap_or_default()
    };

    let headers = (0..=last_col).map(|col| cell(0, col).to_string()).collect();
    let mut table = RawTable::new(headers);
    for row in 1..=last_row {
        table.push_row((0..=last_col).map(|col| cell(row, col)).collect());
    }

    debug!(
        "Read sheet with {} columns and {} data rows",
        table.width(),
        table.rows.len()
    );
    table
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::from(s.as_str()),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
            // Serial date number, as the cell stores it
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from(s.as_str()),
            Data::Error(e) => CellValue::Text(e.to_string()),
        }
    }
}
