use std::path::PathBuf;
use thiserror::Error;

pub type SheetResult<T> = Result<T, SheetError>;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Write error: {0}")]
    Write(String),

    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl SheetError {
    pub(crate) fn not_found(path: impl Into<PathBuf>) -> Self {
        SheetError::FileNotFound { path: path.into() }
    }
}

impl From<serde_yaml::Error> for SheetError {
    fn from(err: serde_yaml::Error) -> Self {
        SheetError::Config(err.to_string())
    }
}
