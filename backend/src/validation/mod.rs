//! Configuration checks run before the pipeline.
//!
//! Every rule is checked and all failures are reported together, so a
//! user can fix a config file in one pass.
//!
//! # Rules
//!
//! - At least one country and one indicator
//! - Country codes and names unique and non-empty
//! - Indicator labels unique and non-empty
//! - Snapshot year inside the year bounds
//! - Chart pair and summary features name configured indicators
//!
//! # Example
//!
//! ```rust,ignore
//! use climind::{validate_config, AnalysisConfig};
//!
//! let config = AnalysisConfig::default();
//! assert!(validate_config(&config).is_ok());
//! ```

use std::collections::HashSet;

use crate::config::AnalysisConfig;

/// Validate a configuration.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with every failed rule otherwise
pub fn validate_config(config: &AnalysisConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.countries.is_empty() {
        errors.push("No countries configured".to_string());
    }
    if config.indicators.is_empty() {
        errors.push("No indicators configured".to_string());
    }

    check_unique(
        "country code",
        config.countries.iter().map(|c| c.code.as_str()),
        &mut errors,
    );
    check_unique(
        "country name",
        config.countries.iter().map(|c| c.name.as_str()),
        &mut errors,
    );
    check_unique(
        "indicator label",
        config.indicators.iter().map(|i| i.label.as_str()),
        &mut errors,
    );

    for indicator in config.indicators.iter().filter(|i| i.file.trim().is_empty()) {
        errors.push(format!("Indicator '{}' has no file", indicator.label));
    }

    if !config.years.contains(config.snapshot_year) {
        errors.push(format!(
            "Snapshot year {} outside [{}, {}]",
            config.snapshot_year,
            config.years.lower(),
            config.years.upper()
        ));
    }

    let labels: HashSet<&str> = config.indicators.iter().map(|i| i.label.as_str()).collect();
    for (role, feature) in [("chart y1", &config.chart.y1), ("chart y2", &config.chart.y2)] {
        if !labels.contains(feature.as_str()) {
            errors.push(format!("Unknown indicator for {}: '{}'", role, feature));
        }
    }
    for feature in &config.summary_features {
        if !labels.contains(feature.as_str()) {
            errors.push(format!("Unknown summary feature: '{}'", feature));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check if a configuration is valid (simple boolean)
pub fn is_valid_config(config: &AnalysisConfig) -> bool {
    validate_config(config).is_ok()
}

fn check_unique<'a>(what: &str, values: impl Iterator<Item = &'a str>, errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for value in values {
        if value.trim().is_empty() {
            errors.push(format!("Empty {}", what));
        } else if !seen.insert(value) {
            errors.push(format!("Duplicate {}: '{}'", what, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Country, Indicator, YearBounds};

    #[test]
    fn test_default_config_valid() {
        assert!(is_valid_config(&AnalysisConfig::default()));
    }

    #[test]
    fn test_empty_lists() {
        let config = AnalysisConfig {
            countries: vec![],
            indicators: vec![],
            summary_features: vec![],
            ..AnalysisConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&"No countries configured".to_string()));
        assert!(errors.contains(&"No indicators configured".to_string()));
    }

    #[test]
    fn test_duplicates_reported() {
        let mut config = AnalysisConfig::default();
        config.countries.push(Country::new("GBR", "Great Britain"));
        config.indicators.push(Indicator::new("Population", "pop2.csv"));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Duplicate country code: 'GBR'".to_string(),
                "Duplicate indicator label: 'Population'".to_string(),
            ]
        );
    }

    #[test]
    fn test_snapshot_year_out_of_bounds() {
        let config = AnalysisConfig {
            years: YearBounds::new(1990, 2000).unwrap(),
            ..AnalysisConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec!["Snapshot year 2014 outside [1990, 2000]".to_string()]);
    }

    #[test]
    fn test_unknown_features_and_labels() {
        let mut config = AnalysisConfig::default();
        config.chart.y2 = "Methane".into();
        config.summary_features.push("Rainfall".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("chart y2"));
        assert!(errors[1].contains("Rainfall"));
    }
}
