//! Indicator sheet loading with encoding and delimiter auto-detection.
//!
//! Sheets are read as raw grids of [`Cell`]s. The first record is kept apart
//! as the column-label line, the way a spreadsheet reader consumes one header
//! row; every following record becomes a data row, blank lines included, so
//! fixed row positions in the sheet stay stable.

use std::io::Write;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::models::Cell;
use crate::table::{IndicatorTable, Row};

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub table: IndicatorTable,
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> LoadResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).to_string(),
        },
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.to_string(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        "utf-16le" | "utf-16" => {
            let (text, _, had_errors) = encoding_rs::UTF_16LE.decode(bytes);
            if had_errors {
                return Err(LoadError::Encoding(format!("invalid {} content", encoding)));
            }
            text.to_string()
        }
        _ => String::from_utf8_lossy(bytes).to_string(),
    };

    // World Bank exports start with a BOM
    Ok(decoded.trim_start_matches('\u{feff}').to_string())
}

/// Detect the delimiter by counting occurrences in the first non-empty line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse decoded sheet content with an explicit delimiter.
///
/// # Example
/// ```ignore
/// use climind::parser::parse_sheet;
///
/// let sheet = parse_sheet("Data Source,WDI\n\nCountry Name,Country Code\nWorld,WLD", ',')?;
/// assert_eq!(sheet.column_labels(), ["Data Source", "WDI"]);
/// assert_eq!(sheet.len(), 3);
/// ```
pub fn parse_sheet(content: &str, delimiter: char) -> LoadResult<IndicatorTable> {
    if content.trim().is_empty() {
        return Err(LoadError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter as u8)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    let column_labels: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(|s| s.trim().to_string()).collect(),
        None => return Err(LoadError::EmptyFile),
    };

    let mut rows: Vec<Row> = Vec::new();
    for record in records {
        let record = record?;
        let row: Row = record.iter().map(Cell::parse).collect();
        rows.push(row);
    }

    // csv skips fully blank lines; reinstate them so positions match the file
    let rows = reinstate_blank_lines(content, rows);

    Ok(IndicatorTable::new(column_labels, rows))
}

/// Re-insert empty rows for blank lines between the label line and the end
/// of the data.
fn reinstate_blank_lines(content: &str, rows: Vec<Row>) -> Vec<Row> {
    let mut lines = content.lines().skip_while(|l| l.is_empty());
    // Label line
    lines.next();

    let blank_mask: Vec<bool> = lines.map(str::is_empty).collect();
    let trailing_blanks = blank_mask.iter().rev().take_while(|b| **b).count();
    let blank_mask = &blank_mask[..blank_mask.len() - trailing_blanks];

    if !blank_mask.iter().any(|b| *b) {
        return rows;
    }

    let mut data = rows.into_iter();
    let mut out = Vec::with_capacity(blank_mask.len());
    for &blank in blank_mask {
        if blank {
            out.push(Vec::new());
        } else if let Some(row) = data.next() {
            out.push(row);
        }
    }
    // Quoted multi-line fields make line counts exceed records
    out.extend(data);
    out
}

/// Parse sheet bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> LoadResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);
    let table = parse_sheet(&content, delimiter)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
    })
}

/// Load an indicator sheet from disk with auto-detection.
pub fn load_indicator<P: AsRef<Path>>(path: P) -> LoadResult<ParseResult> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_bytes_auto(&bytes)
}

/// Write a grid of cells as comma-separated CSV.
pub fn write_sheet<W: Write>(writer: W, rows: &[Row]) -> Result<(), csv::Error> {
    let mut out = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    for row in rows {
        out.write_record(row.iter().map(|c| c.to_string()))?;
    }
    out.flush()?;
    Ok(())
}

/// Write a grid of cells to a CSV file, creating parent directories.
pub fn write_csv<P: AsRef<Path>>(path: P, rows: &[Row]) -> Result<(), csv::Error> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_sheet(file, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD_BANK: &str = "\u{feff}\"Data Source\",\"World Development Indicators\",\n\
\n\
\"Last Updated Date\",\"2023-12-18\",\n\
\n\
\"Country Name\",\"Country Code\",\"Indicator Name\",\"Indicator Code\",\"1960\",\"1961\",\n\
\"World\",\"WLD\",\"CO2 emissions\",\"EN.ATM.CO2E.PC\",\"3.1\",\"3.2\",\n\
\"United Kingdom\",\"GBR\",\"CO2 emissions\",\"EN.ATM.CO2E.PC\",\"11.2\",\"\",\n";

    #[test]
    fn test_world_bank_layout_positions() {
        let result = parse_bytes_auto(WORLD_BANK.as_bytes()).unwrap();
        let table = result.table;

        assert_eq!(result.delimiter, ',');
        assert_eq!(table.column_labels()[0], "Data Source");
        // blank, Last Updated, blank, header, World, United Kingdom
        assert_eq!(table.len(), 6);
        assert!(table.rows()[0].iter().all(Cell::is_empty));
        assert_eq!(table.rows()[1][0], Cell::Text("Last Updated Date".into()));
        assert_eq!(table.rows()[3][0], Cell::Text("Country Name".into()));
        assert_eq!(table.rows()[3][4], Cell::Number(1960.0));
        assert_eq!(table.country_code(5), Some("GBR"));
        assert_eq!(table.rows()[5][5], Cell::Empty);
    }

    #[test]
    fn test_simple_sheet() {
        let table = parse_sheet("labels;x\nWorld;WLD\nChina;CHN", ';').unwrap();
        assert_eq!(table.column_labels(), ["labels", "x"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.country_code(1), Some("CHN"));
    }

    #[test]
    fn test_empty_sheet_error() {
        assert!(matches!(parse_sheet("", ','), Err(LoadError::EmptyFile)));
        assert!(matches!(parse_sheet("\n\n", ','), Err(LoadError::EmptyFile)));
    }

    #[test]
    fn test_ragged_rows_allowed() {
        let table = parse_sheet("a,b,c\n1,2\n1,2,3,4", ',').unwrap();
        assert_eq!(table.rows()[0].len(), 2);
        assert_eq!(table.rows()[1].len(), 4);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("\n\na,b,c"), ',');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
    }

    #[test]
    fn test_latin1_decoding() {
        // "Côte" in ISO-8859-1
        let bytes: &[u8] = &[0x43, 0xF4, 0x74, 0x65];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Côte");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_indicator("/nonexistent/co2.csv").unwrap_err();
        assert!(err.to_string().contains("co2.csv"));
    }

    #[test]
    fn test_write_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("gbr.csv");
        let rows = vec![
            vec![Cell::from("Year"), Cell::from("GDP ($)")],
            vec![Cell::Number(1970.0), Cell::Number(2.5)],
            vec![Cell::Number(1971.0), Cell::Empty],
        ];

        write_csv(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Year,GDP ($)\n1970,2.5\n1971,\n");

        let reloaded = load_indicator(&path).unwrap().table;
        assert_eq!(reloaded.column_labels(), ["Year", "GDP ($)"]);
        assert_eq!(reloaded.rows()[1], vec![Cell::Number(1971.0), Cell::Empty]);
    }
}
