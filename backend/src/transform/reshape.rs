//! Year reshaping: filtered sheet rows → year-indexed country columns.
//!
//! The filtered sheet is transposed so each former year column becomes a
//! row. The first transposed row (country names) names the columns and the
//! second (country codes) keys them. The first [`METADATA_ROWS`] transposed
//! rows (name, code, indicator name, indicator code) are dropped, the year
//! cell of each remaining row is parsed, and rows outside the bounds are
//! discarded.
//!
//! This is a one-way transform: a reshaped table rendered back to a grid no
//! longer has the metadata rows or year cells in the expected places.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ShapeError, ShapeResult};
use crate::models::{Cell, YearBounds};
use crate::table::{year_start, Column, FilteredTable, Row, TimeIndexedTable};

/// Leading transposed rows that carry metadata instead of years.
pub const METADATA_ROWS: usize = 4;

/// Marker for a missing value in DataBank exports.
const MISSING_MARKER: &str = "..";

/// `1970`, `1970.0`, `1970 [YR1970]`
static YEAR_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})(?:\.0+)?(?:\s*\[YR\d{4}\])?$").expect("static regex"));

/// Reshape a filtered sheet into a year-indexed table bounded by `bounds`.
///
/// # Example
/// ```ignore
/// let filtered = select_countries(&sheet, &["GBR"])?;
/// let table = reshape_years(&filtered, YearBounds::new(1970, 2020)?)?;
/// assert_eq!(table.labels(), ["GBR"]);
/// ```
pub fn reshape_years(filtered: &FilteredTable, bounds: YearBounds) -> ShapeResult<TimeIndexedTable> {
    let transposed = transpose(filtered.rows());

    if transposed.len() < METADATA_ROWS {
        return Err(ShapeError::MissingMetadata {
            expected: METADATA_ROWS,
            found: transposed.len(),
        });
    }

    let names = &transposed[0];
    let codes = &transposed[1];

    // Column 0 holds the header row's year labels; the rest are countries
    let labels: Vec<(String, Option<String>)> = names
        .iter()
        .zip(codes)
        .skip(1)
        .map(|(name, code)| {
            let (name, code) = (name.to_string(), code.to_string());
            if code.is_empty() {
                (name, None)
            } else {
                (code, Some(name))
            }
        })
        .collect();

    let mut index = Vec::new();
    let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); labels.len()];

    for (row_idx, row) in transposed.iter().enumerate().skip(METADATA_ROWS) {
        let year = match parse_year(&row[0], row_idx)? {
            Some(y) => y,
            None => continue,
        };
        if !bounds.contains(year) {
            continue;
        }

        let date = year_start(year).ok_or(ShapeError::InvalidYear {
            row: row_idx,
            value: row[0].to_string(),
        })?;
        index.push(date);

        for (col, (label, _)) in labels.iter().enumerate() {
            values[col].push(parse_value(&row[col + 1], row_idx, label)?);
        }
    }

    let columns = labels
        .into_iter()
        .zip(values)
        .map(|((label, alias), values)| {
            let column = Column::new(label, values);
            match alias {
                Some(alias) => column.with_alias(alias),
                None => column,
            }
        })
        .collect();

    Ok(TimeIndexedTable::new(index, columns))
}

/// Swap rows and columns, padding ragged rows with empty cells.
pub fn transpose(rows: &[Row]) -> Vec<Row> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|j| {
            rows.iter()
                .map(|row| row.get(j).cloned().unwrap_or_default())
                .collect()
        })
        .collect()
}

/// Canonical year of a year cell. Empty cells (trailing blank columns) are
/// `None` and never match a range.
pub fn parse_year(cell: &Cell, row: usize) -> ShapeResult<Option<i32>> {
    let invalid = || ShapeError::InvalidYear {
        row,
        value: cell.to_string(),
    };

    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(n) if n.fract() == 0.0 && n.abs() <= f64::from(i32::MAX) => Ok(Some(*n as i32)),
        Cell::Number(_) => Err(invalid()),
        Cell::Text(s) => {
            let caps = YEAR_LABEL.captures(s.trim()).ok_or_else(invalid)?;
            caps[1].parse::<i32>().map(Some).map_err(|_| invalid())
        }
    }
}

fn parse_value(cell: &Cell, row: usize, column: &str) -> ShapeResult<Option<f64>> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(n) if !n.is_finite() => Ok(None),
        Cell::Number(n) => Ok(Some(*n)),
        Cell::Text(s) if s.trim() == MISSING_MARKER => Ok(None),
        Cell::Text(s) => match s.trim().parse::<f64>() {
            // "NaN", "inf" and friends are missing, not values
            Ok(v) if !v.is_finite() => Ok(None),
            Ok(v) => Ok(Some(v)),
            Err(_) => Err(ShapeError::InvalidValue {
                row,
                column: column.to_string(),
                value: s.clone(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::summarize;
    use crate::table::{IndicatorTable, YearIndexed};
    use crate::transform::selector::select_countries;

    /// Sheet with years 1960..=2022 and one value per country per year.
    fn sheet(countries: &[(&str, &str, f64)]) -> IndicatorTable {
        let years = 1960..=2022;
        let mut header: Row = vec![
            Cell::from("Country Name"),
            Cell::from("Country Code"),
            Cell::from("Indicator Name"),
            Cell::from("Indicator Code"),
        ];
        header.extend(years.clone().map(|y| Cell::Number(f64::from(y))));

        let mut rows = vec![
            vec![Cell::from("Last Updated Date"), Cell::from("2023-12-18")],
            vec![],
            header,
        ];
        for (name, code, base) in countries {
            let mut row: Row = vec![
                Cell::from(*name),
                Cell::from(*code),
                Cell::from("GDP per capita"),
                Cell::from("NY.GDP.PCAP.CD"),
            ];
            row.extend(years.clone().map(|y| Cell::Number(base + f64::from(y - 1960))));
            rows.push(row);
        }
        IndicatorTable::from_rows(rows)
    }

    fn bounds(lower: i32, upper: i32) -> YearBounds {
        YearBounds::new(lower, upper).unwrap()
    }

    #[test]
    fn test_select_and_reshape_single_country() {
        let table = sheet(&[("World", "WLD", 0.0), ("United Kingdom", "GBR", 100.0), ("China", "CHN", 50.0)]);
        let filtered = select_countries(&table, &["GBR"]).unwrap();
        let reshaped = reshape_years(&filtered, bounds(1970, 2020)).unwrap();

        assert_eq!(reshaped.labels(), vec!["GBR"]);
        assert_eq!(reshaped.len(), 51);
        assert_eq!(reshaped.years().first(), Some(&1970));
        assert_eq!(reshaped.years().last(), Some(&2020));

        let gbr = reshaped.column("United Kingdom").unwrap();
        assert_eq!(gbr.values[0], Some(110.0));
        assert_eq!(gbr.values[50], Some(160.0));
    }

    #[test]
    fn test_every_year_within_bounds_and_ascending() {
        let table = sheet(&[("World", "WLD", 0.0), ("China", "CHN", 50.0)]);
        let filtered = select_countries(&table, &["WLD", "CHN"]).unwrap();
        let reshaped = reshape_years(&filtered, bounds(1995, 2005)).unwrap();

        let years = reshaped.years();
        assert!(years.iter().all(|y| (1995..=2005).contains(y)));
        assert!(years.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(reshaped.labels(), vec!["WLD", "CHN"]);
    }

    #[test]
    fn test_no_rows_in_range() {
        let table = sheet(&[("World", "WLD", 0.0)]);
        let filtered = select_countries(&table, &["WLD"]).unwrap();
        let reshaped = reshape_years(&filtered, bounds(2100, 2200)).unwrap();

        assert!(reshaped.is_empty());
        assert_eq!(reshaped.labels(), vec!["WLD"]);
        assert!(reshaped.column("WLD").unwrap().values.is_empty());
    }

    #[test]
    fn test_missing_metadata_rows() {
        let filtered = FilteredTable::from_rows(vec![vec![Cell::from("Country Name"), Cell::from("Country Code")]]);
        assert_eq!(
            reshape_years(&filtered, bounds(1970, 2020)),
            Err(ShapeError::MissingMetadata { expected: 4, found: 2 })
        );
    }

    #[test]
    fn test_reshape_is_one_way() {
        let table = sheet(&[("World", "WLD", 0.0), ("United Kingdom", "GBR", 1.0)]);
        let filtered = select_countries(&table, &["GBR"]).unwrap();
        let reshaped = reshape_years(&filtered, bounds(1970, 2020)).unwrap();

        let again = FilteredTable::from_rows(reshaped.to_sheet());
        assert!(reshape_years(&again, bounds(1970, 2020)).is_err());
    }

    #[test]
    fn test_reshape_of_wide_output_fails_on_year() {
        let table = sheet(&[
            ("World", "WLD", 0.0),
            ("United Kingdom", "GBR", 1.0),
            ("China", "CHN", 2.0),
            ("India", "IND", 3.0),
            ("Brazil", "BRA", 4.0),
        ]);
        let filtered = select_countries(&table, &["WLD", "GBR", "CHN", "IND", "BRA"]).unwrap();
        let reshaped = reshape_years(&filtered, bounds(1970, 2020)).unwrap();

        let again = FilteredTable::from_rows(reshaped.to_sheet());
        assert!(matches!(
            reshape_years(&again, bounds(1970, 2020)),
            Err(ShapeError::InvalidYear { .. })
        ));
    }

    #[test]
    fn test_trailing_blank_column_skipped() {
        let mut table_rows = sheet(&[("World", "WLD", 0.0)]).rows().to_vec();
        // Trailing separator on every line
        for row in table_rows.iter_mut().skip(2) {
            row.push(Cell::Empty);
        }
        let filtered = select_countries(&IndicatorTable::from_rows(table_rows), &["WLD"]).unwrap();
        let reshaped = reshape_years(&filtered, bounds(1960, 2022)).unwrap();
        assert_eq!(reshaped.len(), 63);
    }

    #[test]
    fn test_parse_year_forms() {
        assert_eq!(parse_year(&Cell::Number(1970.0), 0), Ok(Some(1970)));
        assert_eq!(parse_year(&Cell::from("1970"), 0), Ok(Some(1970)));
        assert_eq!(parse_year(&Cell::from("1970.0"), 0), Ok(Some(1970)));
        assert_eq!(parse_year(&Cell::from("1970 [YR1970]"), 0), Ok(Some(1970)));
        assert_eq!(parse_year(&Cell::Empty, 0), Ok(None));
        assert!(parse_year(&Cell::from("GBR"), 3).is_err());
        assert!(parse_year(&Cell::Number(1970.5), 3).is_err());
    }

    #[test]
    fn test_missing_and_invalid_values() {
        assert_eq!(parse_value(&Cell::from(".."), 0, "GBR"), Ok(None));
        assert_eq!(parse_value(&Cell::from("2.5"), 0, "GBR"), Ok(Some(2.5)));
        assert_eq!(parse_value(&Cell::Number(f64::NAN), 0, "GBR"), Ok(None));
        assert_eq!(
            parse_value(&Cell::from("n/a"), 7, "GBR"),
            Err(ShapeError::InvalidValue { row: 7, column: "GBR".into(), value: "n/a".into() })
        );
    }

    #[test]
    fn test_non_finite_text_is_missing() {
        assert_eq!(parse_value(&Cell::from("NaN"), 0, "GBR"), Ok(None));
        assert_eq!(parse_value(&Cell::from("nan"), 0, "GBR"), Ok(None));
        assert_eq!(parse_value(&Cell::from("inf"), 0, "GBR"), Ok(None));
        assert_eq!(parse_value(&Cell::from("-Infinity"), 0, "GBR"), Ok(None));
    }

    #[test]
    fn test_nan_text_does_not_poison_summary() {
        let header: Row = ["Country Name", "Country Code", "Indicator Name", "Indicator Code"]
            .into_iter()
            .map(Cell::from)
            .chain([2000.0, 2001.0, 2002.0].map(Cell::Number))
            .collect();
        let uk: Row = vec![
            Cell::from("United Kingdom"),
            Cell::from("GBR"),
            Cell::from("x"),
            Cell::from("y"),
            Cell::parse("NaN"),
            Cell::parse("5"),
            Cell::parse("7"),
        ];
        let filtered = FilteredTable::from_rows(vec![header, uk]);
        let reshaped = reshape_years(&filtered, bounds(2000, 2002)).unwrap();
        assert_eq!(reshaped.column("GBR").unwrap().values, vec![None, Some(5.0), Some(7.0)]);

        let summary = summarize(&reshaped, &["GBR".to_string()], 3).unwrap();
        assert_eq!(summary[0].min, Some(5.0));
        assert_eq!(summary[0].min_year, Some(2001));
        assert_eq!(summary[0].max, Some(7.0));
        assert_eq!(summary[0].max_year, Some(2002));
        assert_eq!(summary[0].mean, Some(6.0));
    }

    #[test]
    fn test_descending_year_columns_keep_source_order() {
        let header: Row = ["Country Name", "Country Code", "Indicator Name", "Indicator Code"]
            .into_iter()
            .map(Cell::from)
            .chain([2002.0, 2001.0, 2000.0, 1999.0].map(Cell::Number))
            .collect();
        let world: Row = ["World", "WLD", "x", "y"]
            .into_iter()
            .map(Cell::from)
            .chain([3.0, 2.0, 1.0, 0.0].map(Cell::Number))
            .collect();
        let filtered = FilteredTable::from_rows(vec![header, world]);

        let reshaped = reshape_years(&filtered, bounds(2000, 2002)).unwrap();
        assert_eq!(reshaped.years(), vec![2002, 2001, 2000]);
        assert_eq!(reshaped.column("WLD").unwrap().values, vec![Some(3.0), Some(2.0), Some(1.0)]);
    }

    #[test]
    fn test_transpose_pads_ragged_rows() {
        let rows = vec![vec![Cell::Number(1.0), Cell::Number(2.0)], vec![Cell::Number(3.0)]];
        let t = transpose(&rows);
        assert_eq!(t, vec![vec![Cell::Number(1.0), Cell::Number(3.0)], vec![Cell::Number(2.0), Cell::Empty]]);
    }
}
