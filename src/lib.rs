//! sheetmap - spreadsheet rows ↔ key-value records
//!
//! This library imports the first sheet of an XLSX, XLS or CSV file as a
//! list of records whose keys come from a caller-supplied field map, and
//! exports records back out under a header map with optional styling.
//!
//! # Features
//!
//! - Header renaming in both directions with [`FieldMap`]
//! - Empty-row skipping and silent dropping of unmapped columns
//! - Styled XLSX export (header fill/font, thin borders, auto-width), cells
//!   written as text so identifiers like `00123` survive
//! - Direct-output export through a [`ResponseSink`]
//!
//! # Example
//!
//! ```no_run
//! use sheetmap::{export, import, CellValue, FieldMap, FileFormat, Record, StyleSpec};
//!
//! let header_map = FieldMap::from([("name", "姓名"), ("age", "年龄")]);
//! let mut alice = Record::new();
//! alice.insert("name".to_string(), CellValue::from("Alice"));
//! alice.insert("age".to_string(), CellValue::from("30"));
//!
//! export("users.xlsx", FileFormat::Xlsx, &header_map, &[alice], &StyleSpec::default())?;
//!
//! let records = import("users.xlsx", FileFormat::Xlsx, &header_map.inverted(), true)?;
//! println!("Imported {} records", records.len());
//! # Ok::<(), sheetmap::SheetError>(())
//! ```

pub mod backend;
pub mod config;
mod delimited;
pub mod error;
mod excel;
pub mod mapper;
pub mod response;
pub mod types;

// Re-export commonly used types
pub use config::{ImportOptions, MapperConfig, StyleSpec};
pub use error::{SheetError, SheetResult};
pub use mapper::{export, import, Destination, RowExporter, RowImporter};
pub use response::{prepare_download, BufferedResponse, ResponseSink};
pub use types::{CellValue, FieldMap, FileFormat, RawTable, Record, RecordSet};
