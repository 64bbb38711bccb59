use crate::backend::{CsvBackend, TabularBackend, XlsBackend, XlsxBackend};
use crate::error::{SheetError, SheetResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

//==============================================================================
// File Formats
//==============================================================================

/// Spreadsheet formats understood by the row mapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Office Open XML workbook (.xlsx)
    Xlsx,
    /// Legacy Excel workbook (.xls)
    Xls,
    /// Comma separated values, first line is the header
    Csv,
}

impl FileFormat {
    /// Identifier used in file extensions and format strings
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
            FileFormat::Csv => "csv",
        }
    }

    /// Detect the format from a path's extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> SheetResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| SheetError::UnsupportedFormat(path.display().to_string()))?;
        ext.parse()
    }

    /// Whether header/data styling is applied on export
    pub fn supports_styling(&self) -> bool {
        !matches!(self, FileFormat::Csv)
    }

    /// Reader/writer strategy for this format
    pub fn backend(&self) -> &'static dyn TabularBackend {
        match self {
            FileFormat::Xlsx => &XlsxBackend,
            FileFormat::Xls => &XlsBackend,
            FileFormat::Csv => &CsvBackend,
        }
    }
}

impl FromStr for FileFormat {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "xlsx" => Ok(FileFormat::Xlsx),
            "xls" => Ok(FileFormat::Xls),
            "csv" => Ok(FileFormat::Csv),
            _ => Err(SheetError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//==============================================================================
// Cell Values
//==============================================================================

/// A single scalar cell value
///
/// Empty text is always represented as [`CellValue::Empty`] when built through
/// the `From` conversions, so `""` and a missing cell compare equal.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// True for missing cells and empty text
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Borrow the text content, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the numeric content, if this is a number cell
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
        }
    }
}

/// Render a number the way a spreadsheet shows it: integral values lose the
/// trailing `.0`.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

//==============================================================================
// Records
//==============================================================================

/// One logical data row: target key -> value, in column order
pub type Record = IndexMap<String, CellValue>;

/// Ordered rows, in source (import) or target (export) order
pub type RecordSet = Vec<Record>;

/// Header/key translation table
///
/// For import the keys are spreadsheet header labels and the values are
/// record keys. For export the keys are record keys and the values are the
/// display headers; insertion order is the column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(IndexMap<String, String>);

impl FieldMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping; re-inserting an existing key keeps its original position
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.0.insert(from.into(), to.into());
    }

    /// Target name for `from`, if mapped
    pub fn get(&self, from: &str) -> Option<&str> {
        self.0.get(from).map(String::as_str)
    }

    /// Whether `from` has a mapping
    pub fn contains(&self, from: &str) -> bool {
        self.0.contains_key(from)
    }

    /// Mappings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Source names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Target names in insertion order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    /// Number of mappings
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Swap keys and values, turning an export header map into an import
    /// field map (and back). Duplicate values keep their last key.
    pub fn inverted(&self) -> FieldMap {
        self.0.iter().map(|(k, v)| (v.clone(), k.clone())).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for FieldMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FieldMap(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for FieldMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

//==============================================================================
// Raw Tables
//==============================================================================

/// Positional sheet contents before any field mapping
///
/// Produced by readers (header row + data rows) and consumed by writers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("xlsx".parse::<FileFormat>().unwrap(), FileFormat::Xlsx);
        assert_eq!("XLS".parse::<FileFormat>().unwrap(), FileFormat::Xls);
        assert_eq!(".csv".parse::<FileFormat>().unwrap(), FileFormat::Csv);
    }

    #[test]
    fn test_format_from_str_unsupported() {
        let err = "ods".parse::<FileFormat>().unwrap_err();
        assert!(matches!(err, SheetError::UnsupportedFormat(ref s) if s == "ods"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            FileFormat::from_path("/tmp/report.XLSX").unwrap(),
            FileFormat::Xlsx
        );
        assert_eq!(FileFormat::from_path("data.csv").unwrap(), FileFormat::Csv);
        assert!(FileFormat::from_path("no_extension").is_err());
        assert!(FileFormat::from_path("notes.txt").is_err());
    }

    #[test]
    fn test_format_backend_matches_format() {
        for format in [FileFormat::Xlsx, FileFormat::Xls, FileFormat::Csv] {
            assert_eq!(format.backend().format(), format);
        }
        assert!(!FileFormat::Csv.supports_styling());
        assert!(FileFormat::Xls.supports_styling());
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::from("Alice").to_string(), "Alice");
        assert_eq!(CellValue::Number(30.0).to_string(), "30");
        assert_eq!(CellValue::Number(-2.0).to_string(), "-2");
        assert_eq!(CellValue::Number(1.5).to_string(), "1.5");
    }

    #[test]
    fn test_cell_value_empty_normalization() {
        assert_eq!(CellValue::from(""), CellValue::Empty);
        assert_eq!(CellValue::from(String::new()), CellValue::Empty);
        assert!(CellValue::Text(String::new()).is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
        assert!(!CellValue::from("0").is_empty());
    }

    #[test]
    fn test_field_map_preserves_insertion_order() {
        let map = FieldMap::from([("name", "姓名"), ("age", "年龄"), ("city", "城市")]);
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["name", "age", "city"]);
        let values: Vec<&str> = map.values().collect();
        assert_eq!(values, vec!["姓名", "年龄", "城市"]);
    }

    #[test]
    fn test_field_map_inverted() {
        let map = FieldMap::from([("name", "姓名"), ("age", "年龄")]);
        let inverted = map.inverted();
        assert_eq!(inverted.get("姓名"), Some("name"));
        assert_eq!(inverted.get("年龄"), Some("age"));
        assert_eq!(inverted.inverted(), map);
    }

    #[test]
    fn test_raw_table_width() {
        let mut table = RawTable::new(vec!["a".to_string(), "b".to_string()]);
        table.push_row(vec![CellValue::from("1")]);
        assert_eq!(table.width(), 2);
        assert_eq!(table.rows.len(), 1);
    }
}
