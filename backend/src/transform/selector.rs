//! Country selection on raw indicator sheets.
//!
//! The row at [`HEADER_ROW`] is always kept and placed first: in the sheet
//! layout this is the `Country Name, Country Code, ..., 1960, ...` row that
//! later supplies the year labels. Matching rows follow in source order.

use std::collections::HashSet;

use crate::error::{ShapeError, ShapeResult};
use crate::table::{FilteredTable, IndicatorTable};

/// Position of the retained header row.
pub const HEADER_ROW: usize = 2;

/// Keep the header row plus the rows whose country code is in `codes`.
///
/// Codes absent from the sheet are skipped without error.
pub fn select_countries<S: AsRef<str>>(table: &IndicatorTable, codes: &[S]) -> ShapeResult<FilteredTable> {
    select_countries_with_header(table, codes, HEADER_ROW)
}

/// [`select_countries`] with an explicit header row position.
pub fn select_countries_with_header<S: AsRef<str>>(
    table: &IndicatorTable,
    codes: &[S],
    header_row: usize,
) -> ShapeResult<FilteredTable> {
    let header = table.rows().get(header_row).ok_or(ShapeError::TooFewRows {
        expected: header_row + 1,
        found: table.len(),
    })?;

    let wanted: HashSet<&str> = codes.iter().map(AsRef::as_ref).collect();

    let mut rows = vec![header.clone()];
    rows.extend(
        table
            .rows()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != header_row)
            .filter(|(i, _)| table.country_code(*i).is_some_and(|code| wanted.contains(code)))
            .map(|(_, row)| row.clone()),
    );

    Ok(FilteredTable::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;
    use crate::table::Row;

    fn row(name: &str, code: &str) -> Row {
        vec![Cell::from(name), Cell::from(code), Cell::Number(1.0)]
    }

    fn sheet() -> IndicatorTable {
        IndicatorTable::from_rows(vec![
            row("Last Updated Date", "2023-12-18"),
            vec![],
            row("Country Name", "Country Code"),
            row("World", "WLD"),
            row("United Kingdom", "GBR"),
            row("China", "CHN"),
        ])
    }

    fn codes(filtered: &FilteredTable) -> Vec<String> {
        filtered.rows().iter().map(|r| r[1].to_string()).collect()
    }

    #[test]
    fn test_header_row_first_then_source_order() {
        let filtered = select_countries(&sheet(), &["CHN", "WLD"]).unwrap();
        assert_eq!(codes(&filtered), vec!["Country Code", "WLD", "CHN"]);
    }

    #[test]
    fn test_absent_code_silently_dropped() {
        let filtered = select_countries(&sheet(), &["GBR", "FRA"]).unwrap();
        assert_eq!(codes(&filtered), vec!["Country Code", "GBR"]);
    }

    #[test]
    fn test_no_match_keeps_header_only() {
        let filtered = select_countries::<&str>(&sheet(), &[]).unwrap();
        assert_eq!(filtered.len(), 1);
        assert!(filtered.selected().is_empty());
    }

    #[test]
    fn test_header_row_not_duplicated() {
        let filtered = select_countries(&sheet(), &["Country Code", "GBR"]).unwrap();
        assert_eq!(codes(&filtered), vec!["Country Code", "GBR"]);
    }

    #[test]
    fn test_rows_are_subset_of_request() {
        let requested = ["WLD", "GBR", "USA"];
        let filtered = select_countries(&sheet(), &requested).unwrap();
        for code in codes(&filtered).iter().skip(1) {
            assert!(requested.contains(&code.as_str()));
        }
    }

    #[test]
    fn test_too_short_sheet() {
        let table = IndicatorTable::from_rows(vec![row("World", "WLD")]);
        assert_eq!(
            select_countries(&table, &["WLD"]),
            Err(ShapeError::TooFewRows { expected: 3, found: 1 })
        );
    }

    #[test]
    fn test_custom_header_row() {
        let filtered = select_countries_with_header(&sheet(), &["WLD"], 0).unwrap();
        assert_eq!(codes(&filtered), vec!["2023-12-18", "WLD"]);
    }
}
