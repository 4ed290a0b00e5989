//! Transformation module.
//!
//! This module turns raw indicator sheets into analysis tables:
//! - Selector: keep the header row and the configured countries
//! - Reshape: transpose to a year index bounded by the analysis window
//! - Splitter: regroup indicator tables into per-country tables
//! - Pipeline: the full analysis run

pub mod pipeline;
pub mod reshape;
pub mod selector;
pub mod splitter;

pub use pipeline::*;
pub use reshape::reshape_years;
pub use selector::{select_countries, select_countries_with_header, HEADER_ROW};
pub use splitter::{split_by_country, JoinKind};
