//! Analysis configuration.
//!
//! Every constant of a run (countries, indicator sheets, year bounds,
//! snapshot year, chart pair) lives in [`AnalysisConfig`]. The defaults
//! reproduce the standard climate/economy comparison; a JSON file can
//! override any field, and `CLIMIND_DATA_DIR` / `CLIMIND_PLOTS_DIR`
//! override the directories.
//!
//! # Example
//!
//! ```rust,ignore
//! let config = AnalysisConfig::from_file("analysis.json")?.apply_env();
//! config.validate()?;
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::models::{Country, Indicator, YearBounds};
use crate::stats::DEFAULT_DECIMALS;
use crate::transform::selector::HEADER_ROW;
use crate::transform::splitter::JoinKind;

/// Overrides `data_dir`.
pub const DATA_DIR_ENV: &str = "CLIMIND_DATA_DIR";
/// Overrides `plots_dir`.
pub const PLOTS_DIR_ENV: &str = "CLIMIND_PLOTS_DIR";

/// The indicator pair drawn per country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    /// Left axis indicator label.
    pub y1: String,
    /// Right axis indicator label.
    pub y2: String,
    /// `[title, x]` or `[title, x, y-left, y-right]`.
    pub labels: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            y1: "GDP ($)".into(),
            y2: "CO2 Emissions".into(),
            labels: vec!["GDP vs CO2".into(), "Year".into()],
        }
    }
}

/// Full description of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    /// Directory holding the indicator sheets.
    pub data_dir: PathBuf,
    /// Directory chart files are written to.
    pub plots_dir: PathBuf,
    /// Countries to select, in output order.
    pub countries: Vec<Country>,
    /// Indicator sheets, in load order.
    pub indicators: Vec<Indicator>,
    /// Inclusive year range kept after reshaping.
    pub years: YearBounds,
    /// Sheet row holding the column header (always retained by selection).
    pub header_row: usize,
    pub snapshot_year: i32,
    pub normalise_snapshot: bool,
    /// Features summarised per country.
    pub summary_features: Vec<String>,
    pub chart: ChartConfig,
    pub join: JoinKind,
    /// Rounding applied to summaries.
    pub decimals: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let countries = [
            ("WLD", "World"),
            ("GBR", "United Kingdom"),
            ("CHN", "China"),
            ("IND", "India"),
            ("BRA", "Brazil"),
            ("USA", "United States"),
            ("NOR", "Norway"),
        ];
        let indicators = [
            ("Export of Goods", "exports.csv"),
            ("Arable Land", "arable_land.csv"),
            ("CO2 Emissions", "co2_per_cap.csv"),
            ("GDP ($)", "gdp_per_cap.csv"),
            ("Fossil Fuel Use", "fossil_fuel.csv"),
            ("Renewable Use", "renewable_energy_use.csv"),
            ("Urban Population", "urban_pop.csv"),
            ("Population", "pop_total.csv"),
            ("Alt Energy", "alt_energy.csv"),
            ("Energy Use", "energy_use.csv"),
        ];

        Self {
            data_dir: PathBuf::from("./data"),
            plots_dir: PathBuf::from("./plots"),
            countries: countries.iter().map(|(c, n)| Country::new(*c, *n)).collect(),
            indicators: indicators.iter().map(|(l, f)| Indicator::new(*l, *f)).collect(),
            years: YearBounds::default(),
            header_row: HEADER_ROW,
            snapshot_year: 2014,
            normalise_snapshot: true,
            summary_features: vec!["CO2 Emissions".into(), "GDP ($)".into()],
            chart: ChartConfig::default(),
            join: JoinKind::default(),
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl AnalysisConfig {
    /// Load a JSON config. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Apply directory overrides from the environment.
    pub fn apply_env(self) -> Self {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = var(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var(PLOTS_DIR_ENV).filter(|d| !d.is_empty()) {
            self.plots_dir = PathBuf::from(dir);
        }
        self
    }

    /// Full path of an indicator sheet.
    pub fn indicator_path(&self, indicator: &Indicator) -> PathBuf {
        self.data_dir.join(&indicator.file)
    }

    pub fn country_codes(&self) -> Vec<&str> {
        self.countries.iter().map(|c| c.code.as_str()).collect()
    }

    pub fn indicator_labels(&self) -> Vec<String> {
        self.indicators.iter().map(|i| i.label.clone()).collect()
    }

    /// Run [`crate::validation::validate_config`], folding messages into an error.
    pub fn validate(&self) -> ConfigResult<()> {
        crate::validation::validate_config(self).map_err(|errors| ConfigError::Invalid { errors })
    }
}
