//! # Climind - climate and economic indicator analysis
//!
//! Climind loads indicator sheets (one country per row, one year per column),
//! keeps a chosen set of countries, reshapes each sheet to a year index and
//! regroups everything into one table per country for summaries and charts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV sheets │────▶│   Parser    │────▶│  Transform  │────▶│   Reports   │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (select +   │     │ (summaries, │
//! │             │     │             │     │  reshape)   │     │   charts)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use climind::{run, AnalysisConfig, RunOptions};
//!
//! fn main() {
//!     let config = AnalysisConfig::default();
//!     let result = run(&config, &RunOptions::default()).unwrap();
//!     println!("Built {} country tables", result.countries.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`logs`] - Leveled, broadcast pipeline logging
//! - [`models`] - Domain models (Cell, Country, Indicator, YearBounds)
//! - [`table`] - Raw and year-indexed tables
//! - [`parser`] - CSV parsing with auto-detection
//! - [`transform`] - Selection, reshaping, splitting and pipeline
//! - [`stats`] - Summaries, snapshots and Spearman correlation
//! - [`report`] - Console rendering and chart export
//! - [`config`] - Analysis configuration
//! - [`validation`] - Configuration checks

// Core modules
pub mod error;
pub mod logs;
pub mod models;
pub mod table;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Statistics and reporting
pub mod report;
pub mod stats;

// Configuration
pub mod config;
pub mod validation;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError,
    ConfigResult,
    LoadError,
    LoadResult,
    PipelineError,
    PipelineResult,
    ShapeError,
    ShapeResult,
};

// =============================================================================
// Re-exports - Models and tables
// =============================================================================

pub use models::{feature_labels, Cell, Country, Indicator, YearBounds};

pub use table::{
    year_start,
    Column,
    CountryTable,
    FilteredTable,
    IndicatorTable,
    Row,
    TimeIndexedTable,
    YearIndexed,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_delimiter,
    detect_encoding,
    load_indicator,
    parse_bytes_auto,
    parse_sheet,
    write_csv,
    write_sheet,
    ParseResult,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    reshape_years,
    select_countries,
    select_countries_with_header,
    split_by_country,
    JoinKind,
    HEADER_ROW,
};

// =============================================================================
// Re-exports - Statistics
// =============================================================================

pub use stats::{snapshot, spearman, summarize, Correlation, FeatureSummary, Snapshot};

// =============================================================================
// Re-exports - Reports
// =============================================================================

pub use report::{
    export_charts,
    print_country_mapping,
    render_snapshot,
    render_summary_table,
    ChartOptions,
    ChartSeries,
};

// =============================================================================
// Re-exports - Config and Validation
// =============================================================================

pub use config::{AnalysisConfig, ChartConfig};
pub use validation::{is_valid_config, validate_config};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    clean_all,
    clean_indicator,
    export_tables,
    load_all,
    run,
    AnalysisResult,
    LoadedIndicator,
    RunOptions,
};
