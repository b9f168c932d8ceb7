use super::Format;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to read or write delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read workbook: {0}")]
    Workbook(String),

    #[error("failed to write workbook: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("cannot determine a table format from '{}'", .0.display())]
    UnknownFormat(PathBuf),

    #[error("the '{0}' format is not supported for writing")]
    UnsupportedWriteFormat(Format),

    #[error("the workbook contains no worksheet")]
    NoWorksheet,

    #[error("table has {columns} columns, more than the {limit} a worksheet can hold")]
    TooManyColumns { columns: usize, limit: usize },

    #[error("conformation has {positions} positions but the molecule has {atoms} atoms")]
    ConformationMismatch { atoms: usize, positions: usize },

    #[error("table has {rows} rows, more than the {limit} a worksheet can hold")]
    TooManyRows { rows: usize, limit: usize },
}

impl From<calamine::Error> for Error {
    fn from(e: calamine::Error) -> Self {
        Error::Workbook(e.to_string())
    }
}
