//! Per-feature min/max/mean summaries of year-indexed tables.

use chrono::Datelike;
use serde::Serialize;

use crate::error::{ShapeError, ShapeResult};
use crate::table::{Column, YearIndexed};

/// Default rounding applied to summary values.
pub const DEFAULT_DECIMALS: u32 = 3;

/// Extremes and mean of one column. Missing values are skipped; all fields
/// are `None` when the column has no values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSummary {
    pub label: String,
    pub min: Option<f64>,
    pub min_year: Option<i32>,
    pub max: Option<f64>,
    pub max_year: Option<i32>,
    pub mean: Option<f64>,
}

/// Summarise `labels` of `table`; an empty list summarises every column.
pub fn summarize<T: YearIndexed>(table: &T, labels: &[String], decimals: u32) -> ShapeResult<Vec<FeatureSummary>> {
    let columns: Vec<&Column> = if labels.is_empty() {
        table.columns().iter().collect()
    } else {
        labels
            .iter()
            .map(|l| table.column(l).ok_or_else(|| ShapeError::MissingColumn(l.clone())))
            .collect::<ShapeResult<_>>()?
    };

    Ok(columns
        .into_iter()
        .map(|column| summarize_column(table, column, decimals))
        .collect())
}

fn summarize_column<T: YearIndexed>(table: &T, column: &Column, decimals: u32) -> FeatureSummary {
    let year_at = |i: usize| table.index().get(i).map(|d| d.year());

    // First occurrence wins on ties
    let mut min: Option<(usize, f64)> = None;
    let mut max: Option<(usize, f64)> = None;
    for (i, v) in column.values.iter().enumerate() {
        let Some(v) = *v else { continue };
        if min.map_or(true, |(_, m)| v < m) {
            min = Some((i, v));
        }
        if max.map_or(true, |(_, m)| v > m) {
            max = Some((i, v));
        }
    }

    FeatureSummary {
        label: column.label.clone(),
        min: min.map(|(_, v)| round_to(v, decimals)),
        min_year: min.and_then(|(i, _)| year_at(i)),
        max: max.map(|(_, v)| round_to(v, decimals)),
        max_year: max.and_then(|(i, _)| year_at(i)),
        mean: mean(column.present()).map(|m| round_to(m, decimals)),
    }
}

/// Arithmetic mean; `None` for an empty input.
pub fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Sample standard deviation (n - 1); `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values.iter().copied())?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Country;
    use crate::table::{year_start, CountryTable};

    fn table() -> CountryTable {
        CountryTable::new(
            Country::new("GBR", "United Kingdom"),
            (2000..=2004).filter_map(year_start).collect(),
            vec![
                Column::new("CO2 Emissions", vec![Some(9.1234), Some(8.0), None, Some(7.5), Some(9.1234)]),
                Column::new("GDP ($)", vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]),
                Column::new("Empty", vec![None; 5]),
            ],
        )
    }

    #[test]
    fn test_summary_values_and_years() {
        let out = summarize(&table(), &["CO2 Emissions".to_string()], 2).unwrap();
        assert_eq!(
            out,
            vec![FeatureSummary {
                label: "CO2 Emissions".into(),
                min: Some(7.5),
                min_year: Some(2003),
                max: Some(9.12),
                max_year: Some(2000),
                mean: Some(8.44),
            }]
        );
    }

    #[test]
    fn test_all_columns_when_no_labels() {
        let out = summarize(&table(), &[], DEFAULT_DECIMALS).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[1].mean, Some(3.0));
        assert_eq!(out[2].min, None);
        assert_eq!(out[2].max_year, None);
    }

    #[test]
    fn test_missing_label() {
        let err = summarize(&table(), &["Population".to_string()], 3).unwrap_err();
        assert_eq!(err, ShapeError::MissingColumn("Population".into()));
    }

    #[test]
    fn test_sample_std() {
        let std = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((std - 2.138).abs() < 1e-3);
        assert_eq!(sample_std(&[1.0]), None);
    }
}
