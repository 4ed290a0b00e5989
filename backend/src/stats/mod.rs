//! Descriptive statistics over year-indexed tables.
//!
//! - Summary: min/max (with years) and mean per feature
//! - Snapshot: one year across indicators, optionally normalised
//! - Correlation: Spearman rank correlation

pub mod correlation;
pub mod snapshot;
pub mod summary;

pub use correlation::{spearman, Correlation};
pub use snapshot::{snapshot, Snapshot};
pub use summary::{summarize, FeatureSummary, DEFAULT_DECIMALS};
