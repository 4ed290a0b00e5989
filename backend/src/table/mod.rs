//! Table types flowing through the pipeline.
//!
//! ```text
//! IndicatorTable ──select──▶ FilteredTable ──reshape──▶ TimeIndexedTable ──split──▶ CountryTable
//!  (raw sheet)               (header + rows)             (year × country)           (year × indicator)
//! ```
//!
//! Raw tables are grids of [`Cell`]s addressed by position. Year-indexed
//! tables share the [`YearIndexed`] trait for column lookup and export.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{Cell, Country};

/// One row of a raw grid.
pub type Row = Vec<Cell>;

// =============================================================================
// Raw tables
// =============================================================================

/// An indicator sheet as loaded: one row per country, year columns to the
/// right of the metadata columns.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    column_labels: Vec<String>,
    rows: Vec<Row>,
}

impl IndicatorTable {
    pub fn new(column_labels: Vec<String>, rows: Vec<Row>) -> Self {
        Self { column_labels, rows }
    }

    /// Build a table without a column-label line.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self::new(Vec::new(), rows)
    }

    /// Labels from the first line of the source file.
    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Country code of row `index` (second column), if it is text.
    pub fn country_code(&self, index: usize) -> Option<&str> {
        self.rows.get(index)?.get(1)?.as_text()
    }
}

/// Rows kept by country selection. The first row is the retained header row.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredTable {
    rows: Vec<Row>,
}

impl FilteredTable {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows after the retained header row.
    pub fn selected(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

// =============================================================================
// Columns
// =============================================================================

/// A named numeric column aligned with a year index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub label: String,
    /// Second name the column answers to (country display name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub values: Vec<Option<f64>>,
}

impl Column {
    pub fn new(label: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self { label: label.into(), alias: None, values }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn matches(&self, key: &str) -> bool {
        self.label == key || self.alias.as_deref() == Some(key)
    }

    /// Present (non-missing) values.
    pub fn present(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().flatten().copied()
    }
}

// =============================================================================
// Year-indexed tables
// =============================================================================

/// Shared behaviour of tables keyed by a yearly date index.
pub trait YearIndexed {
    fn index(&self) -> &[NaiveDate];
    fn columns(&self) -> &[Column];

    fn len(&self) -> usize {
        self.index().len()
    }

    fn is_empty(&self) -> bool {
        self.index().is_empty()
    }

    fn years(&self) -> Vec<i32> {
        self.index().iter().map(|d| d.year()).collect()
    }

    fn labels(&self) -> Vec<&str> {
        self.columns().iter().map(|c| c.label.as_str()).collect()
    }

    /// Look up a column by label or alias.
    fn column(&self, key: &str) -> Option<&Column> {
        self.columns().iter().find(|c| c.matches(key))
    }

    /// Row position of `year`.
    fn position_of_year(&self, year: i32) -> Option<usize> {
        self.index().iter().position(|d| d.year() == year)
    }

    /// Render as a grid: `Year, <labels...>` then one row per year.
    fn to_sheet(&self) -> Vec<Row> {
        let mut header: Row = vec![Cell::from("Year")];
        header.extend(self.columns().iter().map(|c| Cell::Text(c.label.clone())));

        let mut rows = Vec::with_capacity(self.len() + 1);
        rows.push(header);
        for (i, date) in self.index().iter().enumerate() {
            let mut row: Row = vec![Cell::Number(f64::from(date.year()))];
            row.extend(self.columns().iter().map(|c| Cell::from(c.values[i])));
            rows.push(row);
        }
        rows
    }
}

/// Date used to index `year` (1 January).
pub fn year_start(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// One indicator reshaped to years × countries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeIndexedTable {
    index: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl TimeIndexedTable {
    /// Every column must have one value per index entry.
    pub fn new(index: Vec<NaiveDate>, columns: Vec<Column>) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == index.len()));
        Self { index, columns }
    }

    /// Country columns, in selection order.
    pub fn countries(&self) -> Vec<Country> {
        self.columns
            .iter()
            .map(|c| Country::new(c.label.clone(), c.alias.clone().unwrap_or_else(|| c.label.clone())))
            .collect()
    }
}

impl YearIndexed for TimeIndexedTable {
    fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }
}

/// All indicators for one country, one column per indicator label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryTable {
    pub country: Country,
    index: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl CountryTable {
    pub fn new(country: Country, index: Vec<NaiveDate>, columns: Vec<Column>) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == index.len()));
        Self { country, index, columns }
    }
}

impl YearIndexed for CountryTable {
    fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }
}
