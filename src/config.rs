//! Mapper options and their YAML representation
//!
//! Nothing here is read implicitly: host applications either build the
//! structs directly or embed them in their own configuration documents.
//!
//! ```yaml
//! import:
//!   skip_empty_rows: true
//! style:
//!   header_font_color: "#ff0000"
//! field_maps:
//!   users:
//!     姓名: name
//!     年龄: age
//! ```

use crate::error::{SheetError, SheetResult};
use crate::types::FieldMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_HEADER_FONT_COLOR: &str = "#333333";
pub const DEFAULT_HEADER_BG_COLOR: &str = "#99bcac";
pub const DEFAULT_BORDER_COLOR: &str = "#333333";

/// Row filtering applied after a sheet is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Skip data rows whose cells are all empty
    pub skip_empty_rows: bool,
    /// Skip rows that end up with no mapped field (every non-empty column
    /// unmapped). Turning this off keeps such rows as empty records.
    pub drop_unmapped_rows: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            skip_empty_rows: true,
            drop_unmapped_rows: true,
        }
    }
}

/// Cosmetic styling for spreadsheet exports. Ignored for CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSpec {
    pub header_font_color: String,
    pub header_bg_color: String,
    pub border_color: String,
}

impl Default for StyleSpec {
    fn default() -> Self {
        Self {
            header_font_color: DEFAULT_HEADER_FONT_COLOR.to_string(),
            header_bg_color: DEFAULT_HEADER_BG_COLOR.to_string(),
            border_color: DEFAULT_BORDER_COLOR.to_string(),
        }
    }
}

impl StyleSpec {
    pub fn new(
        header_font_color: impl Into<String>,
        header_bg_color: impl Into<String>,
        border_color: impl Into<String>,
    ) -> Self {
        Self {
            header_font_color: header_font_color.into(),
            header_bg_color: header_bg_color.into(),
            border_color: border_color.into(),
        }
    }

    /// Validate the hex colors and resolve them to RGB values
    pub fn palette(&self) -> SheetResult<Palette> {
        Ok(Palette {
            header_font: parse_hex_color(&self.header_font_color)?,
            header_bg: parse_hex_color(&self.header_bg_color)?,
            border: parse_hex_color(&self.border_color)?,
        })
    }
}

/// StyleSpec colors as 0xRRGGBB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub header_font: u32,
    pub header_bg: u32,
    pub border: u32,
}

/// Parse `#RRGGBB` (the `#` is optional)
pub fn parse_hex_color(color: &str) -> SheetResult<u32> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SheetError::InvalidStyle(format!(
            "expected a #RRGGBB color, got '{}'",
            color
        )));
    }
    u32::from_str_radix(hex, 16)
        .map_err(|e| SheetError::InvalidStyle(format!("bad color '{}': {}", color, e)))
}

/// Bundle of options a host application can keep in its config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub import: ImportOptions,
    pub style: StyleSpec,
    /// Named field maps, e.g. one per import/export screen
    pub field_maps: IndexMap<String, FieldMap>,
}

impl MapperConfig {
    pub fn from_yaml_str(yaml: &str) -> SheetResult<Self> {
        let config: MapperConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> SheetResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SheetError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn field_map(&self, name: &str) -> Option<&FieldMap> {
        self.field_maps.get(name)
    }
}
