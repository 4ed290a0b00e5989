//! Regroup per-indicator tables into per-country tables.
//!
//! # Architecture
//!
//! ```text
//! Indicator tables (year × country)     →   Country tables (year × indicator)
//! ┌──────────────────────────┐             ┌──────────────────────────────┐
//! │ GDP:  WLD │ GBR │ CHN     │             │ GBR:  GDP ($) │ CO2 Emissions │
//! │ CO2:  WLD │ GBR │ CHN     │      →      ├──────────────────────────────┤
//! └──────────────────────────┘             │ CHN:  GDP ($) │ CO2 Emissions │
//!                                          └──────────────────────────────┘
//! ```
//!
//! The first indicator seeds each country table; every following indicator
//! is joined on the year index according to [`JoinKind`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{ShapeError, ShapeResult};
use crate::models::{feature_labels, Country};
use crate::table::{Column, CountryTable, TimeIndexedTable, YearIndexed};

/// How indicator columns with different year ranges are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    /// Keep the seed's years; absent years become missing values.
    #[default]
    Left,
    /// Keep only years present in every indicator.
    Inner,
}

/// Build one table per country, in `countries` order.
///
/// Countries are looked up by code, then by display name. `labels` is padded
/// to the number of tables (see [`feature_labels`]).
pub fn split_by_country(
    tables: &[TimeIndexedTable],
    countries: &[Country],
    labels: &[String],
    join: JoinKind,
) -> ShapeResult<Vec<CountryTable>> {
    let labels = feature_labels(tables.len(), labels);

    let mut seen = HashSet::new();
    if let Some(dup) = labels.iter().find(|l| !seen.insert(l.as_str())) {
        return Err(ShapeError::DuplicateLabel(dup.clone()));
    }

    countries
        .iter()
        .map(|country| {
            let mut builder = CountryTableBuilder::new(country.clone(), join);
            for (table, label) in tables.iter().zip(&labels) {
                let column = table
                    .column(&country.code)
                    .or_else(|| table.column(&country.name))
                    .ok_or_else(|| ShapeError::MissingColumn(format!("{} ({})", country.name, label)))?;
                builder.add_indicator(label, table.index(), &column.values);
            }
            Ok(builder.build())
        })
        .collect()
}

/// Accumulates indicator columns for one country.
struct CountryTableBuilder {
    country: Country,
    join: JoinKind,
    index: Option<Vec<NaiveDate>>,
    columns: Vec<Column>,
}

impl CountryTableBuilder {
    fn new(country: Country, join: JoinKind) -> Self {
        Self {
            country,
            join,
            index: None,
            columns: Vec::new(),
        }
    }

    fn add_indicator(&mut self, label: &str, index: &[NaiveDate], values: &[Option<f64>]) {
        let Some(current) = self.index.as_ref() else {
            self.index = Some(index.to_vec());
            self.columns.push(Column::new(label, values.to_vec()));
            return;
        };

        let lookup: HashMap<NaiveDate, Option<f64>> =
            index.iter().copied().zip(values.iter().copied()).collect();

        match self.join {
            JoinKind::Left => {
                let aligned = current
                    .iter()
                    .map(|d| lookup.get(d).copied().flatten())
                    .collect();
                self.columns.push(Column::new(label, aligned));
            }
            JoinKind::Inner => {
                let keep: Vec<bool> = current.iter().map(|d| lookup.contains_key(d)).collect();
                let retain = |values: &[Option<f64>]| -> Vec<Option<f64>> {
                    values
                        .iter()
                        .zip(&keep)
                        .filter(|(_, k)| **k)
                        .map(|(v, _)| *v)
                        .collect()
                };

                for column in &mut self.columns {
                    column.values = retain(&column.values);
                }
                let new_index: Vec<NaiveDate> =
                    current.iter().copied().filter(|d| lookup.contains_key(d)).collect();
                let aligned = new_index.iter().map(|d| lookup[d]).collect();

                self.columns.push(Column::new(label, aligned));
                self.index = Some(new_index);
            }
        }
    }

    fn build(self) -> CountryTable {
        CountryTable::new(self.country, self.index.unwrap_or_default(), self.columns)
    }
}
