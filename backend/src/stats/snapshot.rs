//! Single-year cross-section of every indicator.

use serde::Serialize;

use crate::error::{ShapeError, ShapeResult};
use crate::models::feature_labels;
use crate::table::{TimeIndexedTable, YearIndexed};

use super::summary::{mean, sample_std};

/// Rows are countries, columns are features.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub year: i32,
    pub countries: Vec<String>,
    pub features: Vec<String>,
    /// `values[country][feature]`
    pub values: Vec<Vec<Option<f64>>>,
}

impl Snapshot {
    pub fn value(&self, country: &str, feature: &str) -> Option<f64> {
        let row = self.countries.iter().position(|c| c == country)?;
        let col = self.features.iter().position(|f| f == feature)?;
        self.values[row][col]
    }
}

/// Take `year` from every table. Countries come from the first table's
/// columns; later tables are aligned by column label.
///
/// With `normalise`, each column is mean-normalised first:
/// `(x - mean) / sample_std`. Columns with fewer than two values or zero
/// spread normalise to missing.
pub fn snapshot(tables: &[TimeIndexedTable], year: i32, labels: &[String], normalise: bool) -> ShapeResult<Snapshot> {
    let features = feature_labels(tables.len(), labels);
    let countries: Vec<String> = tables
        .first()
        .map(|t| t.labels().into_iter().map(String::from).collect())
        .unwrap_or_default();

    let mut values = vec![Vec::with_capacity(tables.len()); countries.len()];

    for table in tables {
        let row = table.position_of_year(year).ok_or(ShapeError::MissingYear(year))?;

        for (ci, country) in countries.iter().enumerate() {
            let value = table.column(country).and_then(|column| {
                let v = column.values[row]?;
                if !normalise {
                    return Some(v);
                }
                let present: Vec<f64> = column.present().collect();
                let m = mean(present.iter().copied())?;
                let s = sample_std(&present).filter(|s| *s > 0.0)?;
                Some((v - m) / s)
            });
            values[ci].push(value);
        }
    }

    Ok(Snapshot {
        year,
        countries,
        features,
        values,
    })
}
