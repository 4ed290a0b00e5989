//! High-level analysis pipeline.
//!
//! Combines every stage: loading, country selection, year reshaping,
//! snapshot, per-country split, summaries and chart export.
//!
//! ```text
//! sheets ──load──▶ IndicatorTable ──clean (rayon)──▶ TimeIndexedTable ──split──▶ CountryTable
//!                                                      │                           │
//!                                                      └──▶ Snapshot               ├──▶ summaries
//!                                                                                  └──▶ charts
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use climind::{run, AnalysisConfig, RunOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalysisConfig::default().apply_env();
//!     let result = run(&config, &RunOptions::default())?;
//!     println!("{} country tables", result.countries.len());
//!     Ok(())
//! }
//! ```

use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::AnalysisConfig;
use crate::error::{PipelineError, PipelineResult, ShapeResult};
use crate::logs::{log_info, log_info_indent, log_success, log_success_indent, log_warning};
use crate::models::{Indicator, YearBounds};
use crate::parser::{load_indicator, write_csv};
use crate::report::{export_charts, print_country_mapping, render_snapshot, render_summary_table, ChartOptions, ChartSeries};
use crate::stats::{snapshot, summarize, FeatureSummary, Snapshot};
use crate::table::{CountryTable, IndicatorTable, TimeIndexedTable, YearIndexed};

use super::reshape::reshape_years;
use super::selector::select_countries_with_header;
use super::splitter::split_by_country;

/// A raw sheet with the indicator it was loaded for.
#[derive(Debug, Clone)]
pub struct LoadedIndicator {
    pub indicator: Indicator,
    pub table: IndicatorTable,
}

/// Options for [`run`] that are not part of the analysis itself.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Write chart data files under the plots directory.
    pub save_charts: bool,
    /// Write cleaned and per-country tables under this directory.
    pub export_dir: Option<PathBuf>,
}

/// Result of a complete analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Cleaned indicator tables, in indicator order
    pub cleaned: Vec<TimeIndexedTable>,

    /// One table per configured country
    pub countries: Vec<CountryTable>,

    /// Cross-section at the snapshot year
    pub snapshot: Snapshot,

    /// Configured feature summaries, per country
    pub summaries: Vec<Vec<FeatureSummary>>,

    /// Chart series (empty when the chart labels did not resolve)
    pub charts: Vec<ChartSeries>,

    /// Files written by the export step
    pub exported: Vec<PathBuf>,
}

/// Select `codes` and reshape to `bounds`.
pub fn clean_indicator<S: AsRef<str>>(
    table: &IndicatorTable,
    codes: &[S],
    bounds: YearBounds,
    header_row: usize,
) -> ShapeResult<TimeIndexedTable> {
    let filtered = select_countries_with_header(table, codes, header_row)?;
    reshape_years(&filtered, bounds)
}

/// Clean every indicator in parallel. Output order matches input order; the
/// first failure is returned with its indicator label.
pub fn clean_all(loaded: &[LoadedIndicator], config: &AnalysisConfig) -> PipelineResult<Vec<TimeIndexedTable>> {
    let codes = config.country_codes();

    loaded
        .par_iter()
        .map(|item| {
            clean_indicator(&item.table, &codes, config.years, config.header_row)
                .map_err(|e| PipelineError::for_indicator(&item.indicator.label, e))
        })
        .collect()
}

/// Load every configured indicator sheet.
pub fn load_all(config: &AnalysisConfig) -> PipelineResult<Vec<LoadedIndicator>> {
    log_info(format!("📖 Loading {} indicator sheets...", config.indicators.len()));

    config
        .indicators
        .iter()
        .map(|indicator| {
            let path = config.indicator_path(indicator);
            let parsed = load_indicator(&path).map_err(|e| PipelineError::for_indicator(&indicator.label, e))?;
            log_info_indent(
                format!(
                    "{} ({}, {} rows, encoding {})",
                    indicator.label,
                    path.display(),
                    parsed.table.len(),
                    parsed.encoding
                ),
                1,
            );
            Ok(LoadedIndicator {
                indicator: indicator.clone(),
                table: parsed.table,
            })
        })
        .collect()
}

/// Run the full analysis described by `config`.
pub fn run(config: &AnalysisConfig, options: &RunOptions) -> PipelineResult<AnalysisResult> {
    config.validate()?;

    let loaded = load_all(config)?;
    log_success(format!("Loaded {} sheets", loaded.len()));

    log_info("🌍 Country mapping:");
    print_country_mapping(&config.countries);

    log_info(format!(
        "🧹 Cleaning: {} countries, years {}-{}",
        config.countries.len(),
        config.years.lower(),
        config.years.upper()
    ));
    let cleaned = clean_all(&loaded, config)?;
    for (item, table) in loaded.iter().zip(&cleaned) {
        if table.is_empty() {
            log_warning(format!("{}: no years within bounds", item.indicator.label));
        }
    }
    log_success(format!("Cleaned {} indicators", cleaned.len()));

    let labels = config.indicator_labels();

    log_info(format!("📸 Snapshot for {}", config.snapshot_year));
    let snapshot = snapshot(&cleaned, config.snapshot_year, &labels, config.normalise_snapshot)?;
    log_lines(&render_snapshot(&snapshot));

    log_info("🔀 Splitting by country...");
    let countries = split_by_country(&cleaned, &config.countries, &labels, config.join)?;
    log_success(format!("{} country tables", countries.len()));

    log_info("📊 Summaries:");
    let summaries = countries
        .iter()
        .map(|table| -> PipelineResult<Vec<FeatureSummary>> {
            let summary = summarize(table, &config.summary_features, config.decimals)?;
            log_lines(&render_summary_table(&table.country, &summary));
            Ok(summary)
        })
        .collect::<PipelineResult<_>>()?;

    let chart_options = ChartOptions {
        labels: config.chart.labels.clone(),
        save: options.save_charts,
        produce_summary: true,
        plots_dir: config.plots_dir.clone(),
        date: None,
    };
    let charts = export_charts(&countries, &config.chart.y1, &config.chart.y2, &chart_options)?;

    let exported = match &options.export_dir {
        Some(dir) => export_tables(dir, &loaded, &cleaned, &countries)?,
        None => Vec::new(),
    };

    log_success("✨ Done!");

    Ok(AnalysisResult {
        cleaned,
        countries,
        snapshot,
        summaries,
        charts,
        exported,
    })
}

/// Write cleaned tables to `{dir}/cleaned/{file}` and country tables to
/// `{dir}/countries/{code}.csv`.
pub fn export_tables(
    dir: &Path,
    loaded: &[LoadedIndicator],
    cleaned: &[TimeIndexedTable],
    countries: &[CountryTable],
) -> PipelineResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(cleaned.len() + countries.len());

    for (item, table) in loaded.iter().zip(cleaned) {
        let stem = Path::new(&item.indicator.file)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| item.indicator.label.clone());
        let path = dir.join("cleaned").join(format!("{}.csv", stem));
        write_csv(&path, &table.to_sheet())?;
        log_success_indent(path.display().to_string(), 1);
        written.push(path);
    }

    for table in countries {
        let path = dir.join("countries").join(format!("{}.csv", table.country.code));
        write_csv(&path, &table.to_sheet())?;
        log_success_indent(path.display().to_string(), 1);
        written.push(path);
    }

    log_success(format!("💾 Exported {} tables to {}", written.len(), dir.display()));
    Ok(written)
}

fn log_lines(text: &str) {
    for line in text.lines() {
        log_info(line);
    }
}
