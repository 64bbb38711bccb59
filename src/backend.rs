//! Per-format read/write strategies
//!
//! Each [`FileFormat`] maps to exactly one backend via
//! [`FileFormat::backend`]. Backends only move positional tables in and out
//! of files; header renaming happens in the mapper.

use crate::config::StyleSpec;
use crate::error::SheetResult;
use crate::types::{FileFormat, RawTable};
use std::path::Path;

pub use crate::delimited::CsvBackend;
pub use crate::excel::{XlsBackend, XlsxBackend};

/// Read and write a single positional sheet in one file format
pub trait TabularBackend {
    /// Format this backend reads and writes
    fn format(&self) -> FileFormat;

    /// Read the header row and every data row of the first sheet
    fn read_table(&self, path: &Path) -> SheetResult<RawTable>;

    /// Write `table` to a file, applying `style` where the format supports it
    fn write_file(&self, path: &Path, table: &RawTable, style: &StyleSpec) -> SheetResult<()>;

    /// Serialize `table` into an in-memory payload
    fn render(&self, table: &RawTable, style: &StyleSpec) -> SheetResult<Vec<u8>>;
}
