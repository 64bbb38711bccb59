//! Excel exporter implementation - RawTable → styled worksheet

use crate::config::{Palette, StyleSpec};
use crate::error::{SheetError, SheetResult};
use crate::types::RawTable;
use rust_xlsxwriter::{
    Color, ColNum, Format, FormatAlign, FormatBorder, FormatPattern, RowNum, Workbook,
};
use std::path::Path;
use tracing::debug;

/// Save a styled single-sheet workbook to `path`
pub(crate) fn save_workbook(path: &Path, table: &RawTable, style: &StyleSpec) -> SheetResult<()> {
    let mut workbook = build_workbook(table, style)?;
    workbook
        .save(path)
        .map_err(|e| SheetError::Write(format!("Failed to save Excel file: {}", e)))
}

/// Serialize a styled single-sheet workbook into memory
pub(crate) fn workbook_bytes(table: &RawTable, style: &StyleSpec) -> SheetResult<Vec<u8>> {
    let mut workbook = build_workbook(table, style)?;
    workbook
        .save_to_buffer()
        .map_err(|e| SheetError::Write(format!("Failed to serialize Excel file: {}", e)))
}

fn build_workbook(table: &RawTable, style: &StyleSpec) -> SheetResult<Workbook> {
    let palette = style.palette()?;
    let header_format = header_format(&palette);
    let data_format = data_format(&palette);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // Header row (row 0)
    for (col_idx, header) in table.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, column_number(col_idx)?, header.as_str(), &header_format)
            .map_err(|e| SheetError::Write(format!("Failed to write header: {}", e)))?;
    }

    // Data rows start at row 1; always written as text so values such as
    // "00123" or "=1+1" stay what the caller passed
    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = row_number(row_idx + 1)?;
        for (col_idx, value) in row.iter().enumerate() {
            let text = value.to_string();
            worksheet
                .write_string_with_format(excel_row, column_number(col_idx)?, text.as_str(), &data_format)
                .map_err(|e| SheetError::Write(format!("Failed to write cell: {}", e)))?;
        }
    }

    worksheet.autofit();

    debug!(
        "Built worksheet with {} columns and {} data rows",
        table.width(),
        table.rows.len()
    );
    Ok(workbook)
}

fn header_format(palette: &Palette) -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::RGB(palette.header_font))
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(palette.header_bg))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

fn data_format(palette: &Palette) -> Format {
    Format::new()
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(palette.border))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

fn column_number(idx: usize) -> SheetResult<ColNum> {
    ColNum::try_from(idx)
        .map_err(|_| SheetError::Write(format!("Column {} is out of range", idx + 1)))
}

fn row_number(idx: usize) -> SheetResult<RowNum> {
    RowNum::try_from(idx)
        .map_err(|_| SheetError::Write(format!("Row {} is out of range", idx + 1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn sample_table() -> RawTable {
        let mut table = RawTable::new(vec!["姓名".to_string(), "身份证".to_string()]);
        table.push_row(vec![
            CellValue::from("张三"),
            CellValue::from("522131199703213342"),
        ]);
        table
    }

    #[test]
    fn test_workbook_bytes_is_zip() {
        let bytes = workbook_bytes(&sample_table(), &StyleSpec::default()).unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn test_build_workbook_rejects_bad_color() {
        let style = StyleSpec::new("#ff0000", "green", "#333333");
        let err = workbook_bytes(&sample_table(), &style).unwrap_err();
        assert!(matches!(err, SheetError::InvalidStyle(_)));
    }

    #[test]
    fn test_column_number_limits() {
        assert_eq!(column_number(0).unwrap(), 0);
        assert!(column_number(usize::from(u16::MAX) + 1).is_err());
    }

    #[test]
    fn test_oversized_cell_is_write_error() {
        let mut table = RawTable::new(vec!["notes".to_string()]);
        table.push_row(vec![CellValue::from("x".repeat(40_000))]);
        let err = workbook_bytes(&table, &StyleSpec::default()).unwrap_err();
        assert!(matches!(err, SheetError::Write(_)));
    }
}
