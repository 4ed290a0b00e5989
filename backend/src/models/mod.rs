//! Domain models shared by every pipeline stage.
//!
//! - [`Cell`] - A raw sheet value (empty, number or text)
//! - [`Country`] - Country code and display name
//! - [`Indicator`] - Indicator label and the sheet it is loaded from
//! - [`YearBounds`] - Inclusive `[lower, upper]` year range

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ShapeError;

// =============================================================================
// Cell
// =============================================================================

/// One value of a raw indicator sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Classify a raw field. Only strings containing a digit become numbers,
    /// so labels like "NaN" or "inf" stay text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        if trimmed.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(n) = trimmed.parse::<f64>() {
                return Cell::Number(n);
            }
        }
        Cell::Text(trimmed.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<Option<f64>> for Cell {
    fn from(n: Option<f64>) -> Self {
        n.map_or(Cell::Empty, Cell::Number)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

// =============================================================================
// Country / Indicator
// =============================================================================

/// A country tracked by the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Country {
    /// Three-letter code, e.g. `GBR`.
    pub code: String,
    /// Display name, e.g. `United Kingdom`.
    pub name: String,
}

impl Country {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self { code: code.into(), name: name.into() }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.code, self.name)
    }
}

/// An indicator and the sheet it comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    /// Column label used in per-country tables, e.g. `CO2 Emissions`.
    pub label: String,
    /// Sheet file name, relative to the data directory.
    pub file: String,
}

impl Indicator {
    pub fn new(label: impl Into<String>, file: impl Into<String>) -> Self {
        Self { label: label.into(), file: file.into() }
    }
}

// =============================================================================
// Year Bounds
// =============================================================================

/// Inclusive year range. Serialized as `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[i32; 2]", into = "[i32; 2]")]
pub struct YearBounds {
    lower: i32,
    upper: i32,
}

impl YearBounds {
    pub fn new(lower: i32, upper: i32) -> Result<Self, ShapeError> {
        if lower > upper {
            return Err(ShapeError::InvalidBounds { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> i32 {
        self.lower
    }

    pub fn upper(&self) -> i32 {
        self.upper
    }

    pub fn contains(&self, year: i32) -> bool {
        self.lower <= year && year <= self.upper
    }
}

/// 1970 to 2020, the standard analysis window.
impl Default for YearBounds {
    fn default() -> Self {
        Self { lower: 1970, upper: 2020 }
    }
}

impl TryFrom<[i32; 2]> for YearBounds {
    type Error = ShapeError;

    fn try_from([lower, upper]: [i32; 2]) -> Result<Self, Self::Error> {
        Self::new(lower, upper)
    }
}

impl From<YearBounds> for [i32; 2] {
    fn from(b: YearBounds) -> Self {
        [b.lower, b.upper]
    }
}

// =============================================================================
// Feature Labels
// =============================================================================

/// Resolve `count` column labels from a possibly short list.
///
/// An empty list yields `Feature 1..count`; a short list is padded with
/// `NaN_1..`; extra labels are dropped.
pub fn feature_labels(count: usize, given: &[String]) -> Vec<String> {
    if given.is_empty() {
        return (1..=count).map(|i| format!("Feature {}", i)).collect();
    }

    let mut labels: Vec<String> = given.iter().take(count).cloned().collect();
    let missing = count.saturating_sub(labels.len());
    labels.extend((1..=missing).map(|i| format!("NaN_{}", i)));
    labels
}
