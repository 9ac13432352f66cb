use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocmergeError {
    // Project errors
    #[error("PROJECT_NOT_FOUND: docmerge.toml not found in current or parent directories")]
    ProjectNotFound,

    #[error("CONFIG_PARSE_ERROR: failed to parse docmerge.toml: {0}")]
    ConfigParse(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // Row source errors
    #[error("DATA_SOURCE_ERROR: {0}")]
    DataSource(String),

    #[error("SHEET_NOT_FOUND: sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    // Template errors
    #[error("TEMPLATE_FORMAT_ERROR: {0}")]
    TemplateFormat(String),

    // Output errors
    #[error("WRITE_ERROR: failed to write '{path}': {reason}")]
    Write { path: PathBuf, reason: String },

    // Conversion errors
    #[error("CONVERTER_NOT_FOUND: no LibreOffice binary found (searched: {searched})")]
    ConverterNotFound { searched: String },

    #[error("CONVERSION_ERROR: {input}: {reason}")]
    Conversion { input: PathBuf, reason: String },

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, DocmergeError>;
