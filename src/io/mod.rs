//! Reading and writing of tabular data and molecule files.
//!
//! Tables are read from spreadsheets (`.xlsx`, `.xlsm`, `.xls`, `.xlsb`,
//! `.ods`) or delimited text (`.csv`, `.tsv`) and written to `.xlsx`,
//! `.csv` or `.tsv`. The format is always taken from the file extension.
//! Single conformers can be written as MDL SD files.

use std::fmt;
use std::path::Path;

mod delimited;
pub mod error;
pub mod sdf;
mod workbook;

pub use error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Csv,
    Tsv,
    Xlsx,
    Xls,
    Xlsb,
    Ods,
}

impl Format {
    /// Format implied by the extension of `path` (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(Format::Csv),
            Some("tsv") => Ok(Format::Tsv),
            Some("xlsx" | "xlsm") => Ok(Format::Xlsx),
            Some("xls") => Ok(Format::Xls),
            Some("xlsb") => Ok(Format::Xlsb),
            Some("ods") => Ok(Format::Ods),
            _ => Err(Error::UnknownFormat(path.to_path_buf())),
        }
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, Format::Csv | Format::Tsv | Format::Xlsx)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Csv => write!(f, "CSV"),
            Format::Tsv => write!(f, "TSV"),
            Format::Xlsx => write!(f, "XLSX"),
            Format::Xls => write!(f, "XLS"),
            Format::Xlsb => write!(f, "XLSB"),
            Format::Ods => write!(f, "ODS"),
        }
    }
}

/// A single typed table cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    /// A value that should exist but could not be computed; written as
    /// `NA`.
    Missing,
}

impl Cell {
    /// Text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// A descriptor value: finite numbers are kept, anything else is
    /// missing.
    pub fn numeric(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Missing,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Cell::Missing => f.write_str("NA"),
        }
    }
}

/// A header row plus data rows. Rows may be shorter than the header; the
/// absent trailing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Index of the first column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (`row`, `column`); missing trailing cells are empty.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY)
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }
}

/// Reads the first sheet (or the whole delimited file) at `path`. The
/// first row is the header.
pub fn read_table(path: &Path) -> Result<Table, Error> {
    match Format::from_path(path)? {
        Format::Csv => delimited::read(path, b','),
        Format::Tsv => delimited::read(path, b'\t'),
        Format::Xlsx | Format::Xls | Format::Xlsb | Format::Ods => workbook::read(path),
    }
}

/// Writes `table` to `path`, replacing any existing file.
pub fn write_table(path: &Path, table: &Table) -> Result<(), Error> {
    match Format::from_path(path)? {
        Format::Csv => delimited::write(path, table, b','),
        Format::Tsv => delimited::write(path, table, b'\t'),
        Format::Xlsx => workbook::write(path, table),
        other => Err(Error::UnsupportedWriteFormat(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_from_extensions() {
        assert_eq!(Format::from_path(Path::new("DATA.xlsx")).unwrap(), Format::Xlsx);
        assert_eq!(Format::from_path(Path::new("a/b.CSV")).unwrap(), Format::Csv);
        assert_eq!(Format::from_path(Path::new("x.ods")).unwrap(), Format::Ods);
        assert!(matches!(
            Format::from_path(Path::new("notes.txt")),
            Err(Error::UnknownFormat(_))
        ));
        assert!(Format::from_path(Path::new("no_extension")).is_err());
        assert!(!Format::Xls.is_writable());
    }

    #[test]
    fn cells_display_like_spreadsheet_text() {
        assert_eq!(Cell::Number(1.5).to_string(), "1.5");
        assert_eq!(Cell::Missing.to_string(), "NA");
        assert_eq!(Cell::Empty.to_string(), "");
        assert_eq!(Cell::Bool(true).to_string(), "TRUE");
        assert_eq!(Cell::numeric(Some(f64::NAN)), Cell::Missing);
        assert_eq!(Cell::numeric(None), Cell::Missing);
        assert_eq!(Cell::numeric(Some(2.0)), Cell::Number(2.0));
    }

    #[test]
    fn short_rows_read_as_empty() {
        let mut table = Table::new(vec!["A".into(), "B".into()]);
        table.push_row(vec![Cell::Text("x".into())]);
        assert_eq!(table.cell(0, 1), &Cell::Empty);
        assert_eq!(table.cell(5, 0), &Cell::Empty);
        assert_eq!(table.column_index("B"), Some(1));
    }

    #[test]
    fn refuses_to_write_read_only_formats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ods");
        let err = write_table(&path, &Table::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedWriteFormat(Format::Ods)));
    }
}
