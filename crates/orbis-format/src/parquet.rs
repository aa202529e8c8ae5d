//! Apache Parquet output format.

use arrow::array::{Float64Array, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use orbis_pipeline::IndexPoint;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;

use crate::{FormatError, Formatter};

/// Parquet formatter.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
    /// Zone name recorded on the timestamp column.
    timezone: String,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
            timezone: "UTC".to_string(),
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the zone name stored with the timestamp column.
    ///
    /// Values are always stored as UTC microseconds; the zone only tells
    /// readers how to display them.
    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Creates the Arrow schema for index points.
    fn schema(&self) -> Schema {
        Schema::new(vec![
            Field::new(
                "timestamp",
                DataType::Timestamp(TimeUnit::Microsecond, Some(self.timezone.as_str().into())),
                false,
            ),
            Field::new("value", DataType::Float64, false),
        ])
    }

    /// Converts index points to an Arrow `RecordBatch`.
    fn to_batch(
        &self,
        schema: Arc<Schema>,
        points: &[IndexPoint],
    ) -> Result<RecordBatch, FormatError> {
        let timestamps: Vec<_> = points.iter().map(|p| p.timestamp.timestamp_micros()).collect();
        let values: Vec<_> = points.iter().map(|p| p.value).collect();

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(
                    TimestampMicrosecondArray::from(timestamps)
                        .with_timezone(self.timezone.as_str()),
                ),
                Arc::new(Float64Array::from(values)),
            ],
        )
        .map_err(|e| FormatError::Parquet(e.to_string()))
    }
}

impl Formatter for ParquetFormatter {
    fn write_index<W: Write + Send>(
        &self,
        points: &[IndexPoint],
        writer: W,
    ) -> Result<(), FormatError> {
        let schema = Arc::new(self.schema());
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, Arc::clone(&schema), Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        for chunk in points.chunks(self.row_group_size.max(1)) {
            let batch = self.to_batch(Arc::clone(&schema), chunk)?;
            arrow_writer.write(&batch).map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer.close().map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use std::io::Cursor;

    fn create_test_points(n: i64) -> Vec<IndexPoint> {
        let start = chrono_tz::America::New_York.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| IndexPoint {
                timestamp: (start + TimeDelta::days(i)).fixed_offset(),
                value: 400.0 + i as f64,
            })
            .collect()
    }

    #[test]
    fn test_parquet_index() {
        let formatter = ParquetFormatter::new().with_timezone("America/New_York");
        let mut output = Cursor::new(Vec::new());

        formatter.write_index(&create_test_points(5), &mut output).unwrap();

        // Parquet files start and end with "PAR1" magic bytes
        let data = output.into_inner();
        assert!(data.len() > 8);
        assert_eq!(&data[0..4], b"PAR1");
        assert_eq!(&data[data.len() - 4..], b"PAR1");
    }

    #[test]
    fn test_small_row_groups() {
        let formatter = ParquetFormatter::new().with_row_group_size(2);
        let mut output = Cursor::new(Vec::new());

        formatter.write_index(&create_test_points(5), &mut output).unwrap();

        assert_eq!(&output.into_inner()[0..4], b"PAR1");
    }

    #[test]
    fn test_schema_carries_timezone() {
        let schema = ParquetFormatter::new().with_timezone("Asia/Tokyo").schema();

        assert_eq!(schema.fields().len(), 2);
        assert_eq!(
            schema.field_with_name("timestamp").unwrap().data_type(),
            &DataType::Timestamp(TimeUnit::Microsecond, Some("Asia/Tokyo".into()))
        );
        assert!(schema.field_with_name("value").is_ok());
    }
}
