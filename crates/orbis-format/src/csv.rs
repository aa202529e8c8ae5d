//! CSV output format.

use chrono::SecondsFormat;
use orbis_pipeline::IndexPoint;
use std::io::Write;

use crate::{FormatError, Formatter};

/// CSV formatter.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
    /// Decimal places for values; full precision when unset.
    precision: Option<usize>,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
            precision: None,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Rounds values to `digits` decimal places.
    #[must_use]
    pub const fn with_precision(mut self, digits: usize) -> Self {
        self.precision = Some(digits);
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self::new().with_delimiter('\t')
    }
}

impl Formatter for CsvFormatter {
    fn write_index<W: Write + Send>(
        &self,
        points: &[IndexPoint],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(writer, "timestamp{d}value")?;
        }

        for point in points {
            let timestamp = point.timestamp.to_rfc3339_opts(SecondsFormat::Secs, false);
            match self.precision {
                Some(digits) => writeln!(writer, "{timestamp}{d}{:.digits$}", point.value)?,
                None => writeln!(writer, "{timestamp}{d}{}", point.value)?,
            }
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}
