//! Error types for the indicator pipeline.
//!
//! - [`LoadError`] - Reading and decoding indicator sheets
//! - [`ShapeError`] - Sheets or tables that do not have the expected layout
//! - [`ConfigError`] - Loading and validating the analysis configuration
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Conversion into [`PipelineError`] is automatic via `From` implementations,
//! so `?` works across stage boundaries.

use thiserror::Error;

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while reading an indicator sheet from disk or bytes.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file.
    #[error("Failed to read file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Content could not be decoded.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// Malformed CSV record.
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file.
    #[error("Indicator sheet is empty")]
    EmptyFile,
}

// =============================================================================
// Shape Errors
// =============================================================================

/// A sheet or table does not have the layout a transformation expects.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShapeError {
    /// Fewer rows than the transformation needs.
    #[error("Expected at least {expected} rows, found {found}")]
    TooFewRows { expected: usize, found: usize },

    /// The transposed sheet lacks the leading metadata rows.
    #[error("Missing metadata rows: expected {expected}, found {found}")]
    MissingMetadata { expected: usize, found: usize },

    /// A year cell could not be read as a year.
    #[error("Row {row}: '{value}' is not a year")]
    InvalidYear { row: usize, value: String },

    /// A data cell could not be read as a number.
    #[error("Row {row}, column '{column}': '{value}' is not numeric")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    /// A requested column does not exist.
    #[error("Column not found: {0}")]
    MissingColumn(String),

    /// Two output columns would share a label.
    #[error("Duplicate column label: {0}")]
    DuplicateLabel(String),

    /// A requested year is absent from the index.
    #[error("Year {0} not present in table")]
    MissingYear(i32),

    /// Year bounds out of order.
    #[error("Invalid year bounds: {lower} > {upper}")]
    InvalidBounds { lower: i32, upper: i32 },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors while loading or validating the analysis configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config JSON is malformed.
    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config failed validation.
    #[error("Invalid config: {}", .errors.join("; "))]
    Invalid { errors: Vec<String> },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading error.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Data-shape error.
    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A stage failed on a specific indicator.
    #[error("Indicator '{label}': {source}")]
    Indicator {
        label: String,
        #[source]
        source: Box<PipelineError>,
    },

    /// Writing an output file failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Writing a CSV output failed.
    #[error("CSV output error: {0}")]
    CsvOutput(#[from] csv::Error),
}

impl PipelineError {
    /// Attach the indicator label the error occurred on.
    pub fn for_indicator(label: impl Into<String>, err: impl Into<PipelineError>) -> Self {
        Self::Indicator {
            label: label.into(),
            source: Box::new(err.into()),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for shape-sensitive transformations.
pub type ShapeResult<T> = Result<T, ShapeError>;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
