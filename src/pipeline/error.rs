//! Errors that abort a pipeline run.
//!
//! Everything here is a configuration problem: a missing or unreadable
//! file, an unusable format, a table without the SMILES column. Failures
//! of single molecules or trials never surface as an [`Error`]; they are
//! counted in the [`PipelineReport`](super::PipelineReport).

use crate::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The input table has no column with the configured SMILES header.
    #[error("input table has no '{column}' column (found: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// The file extension names no readable (or, for output, writable)
    /// table format.
    #[error("unsupported table format for '{}': {detail}", .path.display())]
    UnsupportedFormat { path: PathBuf, detail: String },

    /// The input table has a header but no data rows.
    #[error("input table '{}' contains no data rows", .0.display())]
    EmptyTable(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("cannot access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The table reader or writer failed.
    #[error("table I/O failed for '{}': {source}", .path.display())]
    Table { path: PathBuf, source: io::Error },
}

impl Error {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn unsupported_format(path: &Path, detail: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }

    /// Wraps a table error, lifting format and file-system failures into
    /// their own variants.
    pub fn table(path: &Path, source: io::Error) -> Self {
        match source {
            io::Error::UnknownFormat(_) => Self::unsupported_format(path, "unknown extension"),
            io::Error::UnsupportedWriteFormat(format) => {
                Self::unsupported_format(path, format!("{format} cannot be written"))
            }
            io::Error::Io { source } => Self::io(path, source),
            source => Self::Table {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}
