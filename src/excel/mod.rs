//! Excel import/export backends
//!
//! - Import: first worksheet of .xlsx / .xls → RawTable (calamine)
//! - Export: RawTable → styled .xlsx worksheet (rust_xlsxwriter)

mod exporter;
mod importer;

use crate::backend::TabularBackend;
use crate::config::StyleSpec;
use crate::error::SheetResult;
use crate::types::{FileFormat, RawTable};
use std::path::Path;

/// Office Open XML workbooks
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxBackend;

impl TabularBackend for XlsxBackend {
    fn format(&self) -> FileFormat {
        FileFormat::Xlsx
    }

    fn read_table(&self, path: &Path) -> SheetResult<RawTable> {
        importer::read_xlsx(path)
    }

    fn write_file(&self, path: &Path, table: &RawTable, style: &StyleSpec) -> SheetResult<()> {
        exporter::save_workbook(path, table, style)
    }

    fn render(&self, table: &RawTable, style: &StyleSpec) -> SheetResult<Vec<u8>> {
        exporter::workbook_bytes(table, style)
    }
}

/// Legacy .xls workbooks
///
/// Reads BIFF files. Writing produces an OOXML workbook, since no BIFF
/// writer is available; Excel and LibreOffice open it under the .xls name
/// and this backend reads it back.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsBackend;

impl TabularBackend for XlsBackend {
    fn format(&self) -> FileFormat {
        FileFormat::Xls
    }

    fn read_table(&self, path: &Path) -> SheetResult<RawTable> {
        importer::read_xls(path)
    }

    fn write_file(&self, path: &Path, table: &RawTable, style: &StyleSpec) -> SheetResult<()> {
        exporter::save_workbook(path, table, style)
    }

    fn render(&self, table: &RawTable, style: &StyleSpec) -> SheetResult<Vec<u8>> {
        exporter::workbook_bytes(table, style)
    }
}
