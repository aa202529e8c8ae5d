//! Output format abstraction.

use orbis_pipeline::IndexPoint;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::{CsvFormatter, JsonFormatter};

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// CSV format.
    #[default]
    Csv,
    /// JSON array format.
    Json,
    /// Newline-delimited JSON format.
    Ndjson,
    /// Apache Parquet format.
    Parquet,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Json, Self::Ndjson, Self::Parquet]
    }

    /// Infers the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }

    /// Writes `points` with this format's default formatter.
    ///
    /// Parquet output is stamped with the `timezone` name; the text formats
    /// carry the offset in every timestamp instead.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails, or for Parquet when the `parquet`
    /// feature is disabled.
    pub fn write<W: Write + Send>(
        self,
        points: &[IndexPoint],
        timezone: &str,
        writer: W,
    ) -> Result<(), FormatError> {
        match self {
            Self::Csv => CsvFormatter::new().write_index(points, writer),
            Self::Json => JsonFormatter::new().write_index(points, writer),
            Self::Ndjson => JsonFormatter::ndjson().write_index(points, writer),
            #[cfg(feature = "parquet")]
            Self::Parquet => {
                crate::ParquetFormatter::new().with_timezone(timezone).write_index(points, writer)
            }
            #[cfg(not(feature = "parquet"))]
            Self::Parquet => {
                let _ = (timezone, writer);
                Err(FormatError::Unsupported(self))
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" | "tsv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "parquet" | "pq" => Ok(Self::Parquet),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during formatting.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Format compiled out of this build.
    #[error("Format {0} is not enabled in this build")]
    Unsupported(OutputFormat),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow/Parquet error.
    #[error("Parquet error: {0}")]
    Parquet(String),
}

/// Trait for index writers.
pub trait Formatter: Send + Sync {
    /// Writes the index points in order.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_index<W: Write + Send>(
        &self,
        points: &[IndexPoint],
        writer: W,
    ) -> Result<(), FormatError>;

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}
