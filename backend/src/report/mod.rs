//! Console reports and chart export.
//!
//! - [`print_country_mapping`] - code/name check printed before a run
//! - [`render_summary_table`] - per-country feature summaries
//! - [`render_snapshot`] - single-year cross-section
//! - [`charts`] - paired time series written as chart data

pub mod charts;

use std::fmt::Write;

use crate::logs::log_info;
use crate::models::Country;
use crate::stats::{FeatureSummary, Snapshot};

pub use charts::{export_charts, ChartLabels, ChartOptions, ChartSeries, PairSummary, SeriesStats};

/// Log `CODE = Name` for every country.
pub fn print_country_mapping(countries: &[Country]) {
    for country in countries {
        log_info(country.to_string());
    }
}

/// Render summaries as a table with one column per feature.
///
/// ```text
///            CO2 Emissions   GDP ($)
/// Min                5.123    2348.3
/// ...
/// ```
pub fn render_summary_table(country: &Country, summaries: &[FeatureSummary]) -> String {
    let widths: Vec<usize> = summaries.iter().map(|s| s.label.len().max(12)).collect();
    let mut out = String::new();

    let _ = writeln!(out, "{}", country.name);
    let _ = write!(out, "{:<10}", "");
    for (s, w) in summaries.iter().zip(&widths) {
        let _ = write!(out, "  {:>w$}", s.label, w = w);
    }
    out.push('\n');

    let rows: [(&str, fn(&FeatureSummary) -> String); 5] = [
        ("Min", |s| fmt_value(s.min)),
        ("Min Year", |s| fmt_year(s.min_year)),
        ("Max", |s| fmt_value(s.max)),
        ("Max Year", |s| fmt_year(s.max_year)),
        ("Mean", |s| fmt_value(s.mean)),
    ];
    for (name, cell) in rows {
        let _ = write!(out, "{:<10}", name);
        for (s, w) in summaries.iter().zip(&widths) {
            let _ = write!(out, "  {:>w$}", cell(s), w = w);
        }
        out.push('\n');
    }
    out
}

/// Render a snapshot with countries as rows and features as columns.
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let name_width = snapshot.countries.iter().map(String::len).max().unwrap_or(0).max(7);
    let widths: Vec<usize> = snapshot.features.iter().map(|f| f.len().max(8)).collect();
    let mut out = String::new();

    let _ = write!(out, "{:<name_width$}", snapshot.year, name_width = name_width);
    for (f, w) in snapshot.features.iter().zip(&widths) {
        let _ = write!(out, "  {:>w$}", f, w = w);
    }
    out.push('\n');

    for (country, values) in snapshot.countries.iter().zip(&snapshot.values) {
        let _ = write!(out, "{:<name_width$}", country, name_width = name_width);
        for (v, w) in values.iter().zip(&widths) {
            let cell = v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "NaN".to_string());
            let _ = write!(out, "  {:>w$}", cell, w = w);
        }
        out.push('\n');
    }
    out
}

fn fmt_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "NaN".to_string())
}

fn fmt_year(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_table_layout() {
        let summaries = vec![FeatureSummary {
            label: "CO2 Emissions".into(),
            min: Some(5.123),
            min_year: Some(2019),
            max: Some(11.8),
            max_year: Some(1973),
            mean: None,
        }];
        let text = render_summary_table(&Country::new("GBR", "United Kingdom"), &summaries);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "United Kingdom");
        assert!(lines[1].ends_with("CO2 Emissions"));
        assert!(lines[2].starts_with("Min") && lines[2].ends_with("5.123"));
        assert!(lines[3].ends_with("2019"));
        assert!(lines[6].starts_with("Mean") && lines[6].ends_with("NaN"));
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_snapshot_layout() {
        let snapshot = Snapshot {
            year: 2014,
            countries: vec!["WLD".into(), "GBR".into()],
            features: vec!["GDP ($)".into()],
            values: vec![vec![Some(1.234)], vec![None]],
        };
        let text = render_snapshot(&snapshot);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("2014"));
        assert!(lines[0].ends_with("GDP ($)"));
        assert!(lines[1].starts_with("WLD") && lines[1].ends_with("1.23"));
        assert!(lines[2].starts_with("GBR") && lines[2].ends_with("NaN"));
    }
}
