//! Paired time-series charts, exported as chart data.
//!
//! Each country table yields one chart titled `"{country}: {title}"` with
//! `y1` on the left axis and `y2` on the right. With `save`, the series are
//! written to `{plots_dir}/{title}_{dd-mm-YYYY}.csv`; with
//! `produce_summary`, max/min/mean of both series and their Spearman
//! correlation are logged.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::PathBuf;

use crate::error::{PipelineResult, ShapeError};
use crate::logs::{log_error, log_info, log_info_indent, log_success};
use crate::models::{Cell, Country};
use crate::parser::write_csv;
use crate::stats::summary::mean;
use crate::stats::{spearman, Correlation};
use crate::table::{CountryTable, Row, YearIndexed};

/// Options for [`export_charts`].
#[derive(Debug, Clone, Default)]
pub struct ChartOptions {
    /// `[title, x]` (axes named after the series) or
    /// `[title, x, y-left, y-right]`.
    pub labels: Vec<String>,
    /// Write chart data files.
    pub save: bool,
    /// Log summary statistics per chart.
    pub produce_summary: bool,
    pub plots_dir: PathBuf,
    /// Date stamped into file names; today when `None`.
    pub date: Option<NaiveDate>,
}

/// Resolved chart labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLabels {
    pub title: String,
    pub x: String,
    pub y_left: String,
    pub y_right: String,
}

impl ChartLabels {
    /// Two labels are completed with the series names; anything other than
    /// four after that is `None`.
    pub fn resolve(labels: &[String], y1: &str, y2: &str) -> Option<Self> {
        let mut labels = labels.to_vec();
        if labels.len() == 2 {
            labels.extend([y1.to_string(), y2.to_string()]);
        }
        match <[String; 4]>::try_from(labels) {
            Ok([title, x, y_left, y_right]) => Some(Self { title, x, y_left, y_right }),
            Err(_) => None,
        }
    }
}

/// Max, min and mean of one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStats {
    pub label: String,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub mean: Option<f64>,
}

impl SeriesStats {
    fn of(label: &str, values: &[Option<f64>]) -> Self {
        let present = || values.iter().flatten().copied();
        Self {
            label: label.to_string(),
            max: present().reduce(f64::max),
            min: present().reduce(f64::min),
            mean: mean(present()),
        }
    }
}

/// Statistics logged for one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairSummary {
    pub left: SeriesStats,
    pub right: SeriesStats,
    pub correlation: Option<Correlation>,
}

/// One country's chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub country: Country,
    pub labels: ChartLabels,
    pub years: Vec<i32>,
    pub left: Vec<Option<f64>>,
    pub right: Vec<Option<f64>>,
    /// Written file, when saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<PairSummary>,
}

impl ChartSeries {
    /// Grid of `Year, y-left, y-right`.
    pub fn to_sheet(&self) -> Vec<Row> {
        let mut rows = vec![vec![
            Cell::from(self.labels.x.as_str()),
            Cell::from(self.labels.y_left.as_str()),
            Cell::from(self.labels.y_right.as_str()),
        ]];
        for ((year, l), r) in self.years.iter().zip(&self.left).zip(&self.right) {
            rows.push(vec![Cell::Number(f64::from(*year)), Cell::from(*l), Cell::from(*r)]);
        }
        rows
    }
}

/// Build (and optionally save and summarise) one chart per country table.
///
/// A label list that cannot be resolved to four entries is logged and
/// yields no charts. A table lacking `y1` or `y2` is an error.
pub fn export_charts(
    tables: &[CountryTable],
    y1: &str,
    y2: &str,
    options: &ChartOptions,
) -> PipelineResult<Vec<ChartSeries>> {
    log_info("Exporting charts");

    let Some(labels) = ChartLabels::resolve(&options.labels, y1, y2) else {
        log_error(format!(
            "Labels is missing {} parameters",
            4i64 - options.labels.len() as i64
        ));
        return Ok(Vec::new());
    };

    let date = options.date.unwrap_or_else(|| Local::now().date_naive());
    let stamp = date.format("%d-%m-%Y").to_string();

    let mut charts = Vec::with_capacity(tables.len());
    for table in tables {
        let left = table.column(y1).ok_or_else(|| ShapeError::MissingColumn(y1.to_string()))?;
        let right = table.column(y2).ok_or_else(|| ShapeError::MissingColumn(y2.to_string()))?;

        let mut chart = ChartSeries {
            title: format!("{}: {}", table.country.name, labels.title),
            country: table.country.clone(),
            labels: labels.clone(),
            years: table.years(),
            left: left.values.clone(),
            right: right.values.clone(),
            file: None,
            summary: None,
        };

        if options.save {
            let path = options.plots_dir.join(format!("{}_{}.csv", file_stem(&chart.title), stamp));
            write_csv(&path, &chart.to_sheet())?;
            log_success(format!("Saved {}", path.display()));
            chart.file = Some(path);
        }

        if options.produce_summary {
            let summary = PairSummary {
                left: SeriesStats::of(y1, &chart.left),
                right: SeriesStats::of(y2, &chart.right),
                correlation: spearman(&chart.left, &chart.right),
            };
            log_pair_summary(&table.country, &summary);
            chart.summary = Some(summary);
        }

        charts.push(chart);
    }

    Ok(charts)
}

fn file_stem(title: &str) -> String {
    title.replace(['/', '\\'], "-")
}

fn log_pair_summary(country: &Country, summary: &PairSummary) {
    let fmt = |v: Option<f64>| v.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "NaN".into());

    log_info(format!("Summary for {}", country.name));
    for stats in [&summary.left, &summary.right] {
        log_info_indent(
            format!(
                "{}: max {} | min {} | mean {}",
                stats.label,
                fmt(stats.max),
                fmt(stats.min),
                fmt(stats.mean)
            ),
            1,
        );
    }
    match &summary.correlation {
        Some(c) => log_info_indent(
            format!("Spearman r {:.4} (p = {:e}, n = {})", c.coefficient, c.p_value, c.observations),
            1,
        ),
        None => log_info_indent("Spearman r undefined", 1),
    }
}
