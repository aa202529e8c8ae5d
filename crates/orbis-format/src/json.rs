//! JSON output format.

use orbis_pipeline::IndexPoint;
use std::io::Write;

use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Output style.
    style: JsonStyle,
    /// Whether to pretty-print (only for array style).
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }
}

impl Formatter for JsonFormatter {
    fn write_index<W: Write + Send>(
        &self,
        points: &[IndexPoint],
        mut writer: W,
    ) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Array => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, points)?;
                } else {
                    serde_json::to_writer(&mut writer, points)?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for point in points {
                    serde_json::to_writer(&mut writer, point)?;
                    writeln!(writer)?;
                }
            }
        }
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use std::io::Cursor;

    fn create_test_points(n: i64) -> Vec<IndexPoint> {
        let start = chrono_tz::Europe::London.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| IndexPoint {
                timestamp: (start + TimeDelta::days(i)).fixed_offset(),
                value: 100.5 + i as f64,
            })
            .collect()
    }

    fn render(formatter: &JsonFormatter, points: &[IndexPoint]) -> String {
        let mut output = Cursor::new(Vec::new());
        formatter.write_index(points, &mut output).unwrap();
        String::from_utf8(output.into_inner()).unwrap()
    }

    #[test]
    fn test_json_array() {
        let result = render(&JsonFormatter::new(), &create_test_points(1));

        assert!(result.starts_with('['));
        assert!(result.contains("\"timestamp\":\"2024-07-01T00:00:00+01:00\""));
        assert!(result.contains("\"value\":100.5"));
    }

    #[test]
    fn test_json_parses_back() {
        let points = create_test_points(3);
        let result = render(&JsonFormatter::new(), &points);

        let parsed: Vec<IndexPoint> = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed, points);
    }

    #[test]
    fn test_ndjson() {
        let formatter = JsonFormatter::ndjson();
        let result = render(&formatter, &create_test_points(2));

        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('{'));
        assert_eq!(formatter.extension(), "ndjson");
    }

    #[test]
    fn test_pretty_json() {
        let formatter = JsonFormatter::new().with_pretty(true);
        let result = render(&formatter, &create_test_points(1));

        assert!(result.contains('\n'));
        assert!(result.contains("  ")); // Indentation
    }
}
