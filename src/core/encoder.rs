use crate::domain::model::{ColumnData, OutputFormat, Table};
use crate::utils::error::{EtlError, Result};

/// Serializes a table with the requested output format.
pub fn encode(table: &Table, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => encode_csv(table),
        #[cfg(feature = "parquet")]
        OutputFormat::Parquet => parquet_output::encode_parquet(table),
        #[cfg(not(feature = "parquet"))]
        OutputFormat::Parquet => Err(EtlError::WriteError {
            message: "Parquet output is not available in this build".to_string(),
        }),
    }
}

/// Header row plus one line per row; missing values are written as empty fields.
pub fn encode_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(table.columns().iter().map(|c| c.name.as_str()))?;

    for row in 0..table.num_rows() {
        let fields = table.columns().iter().map(|column| match &column.data {
            ColumnData::Numeric(values) => values[row].map(format_number).unwrap_or_default(),
            ColumnData::Textual(values) => values[row].clone().unwrap_or_default(),
        });
        writer.write_record(fields)?;
    }

    writer.into_inner().map_err(|e| EtlError::WriteError {
        message: format!("Failed to flush CSV output: {}", e),
    })
}

fn format_number(value: f64) -> String {
    value.to_string()
}

#[cfg(feature = "parquet")]
mod parquet_output {
    use super::*;
    use arrow::array::{ArrayRef, Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::{RecordBatch, RecordBatchOptions};
    use parquet::arrow::ArrowWriter;
    use parquet::basic::Compression;
    use parquet::file::properties::WriterProperties;
    use parquet::format::KeyValue;
    use std::sync::Arc;

    fn writer_properties() -> WriterProperties {
        let created_by = KeyValue {
            key: "created_by".to_string(),
            value: Some(concat!("csv-lake-etl ", env!("CARGO_PKG_VERSION")).to_string()),
        };
        WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .set_key_value_metadata(Some(vec![created_by]))
            .build()
    }

    pub(super) fn schema_for(table: &Table) -> Arc<Schema> {
        let fields: Vec<Field> = table
            .columns()
            .iter()
            .map(|column| {
                let data_type = match column.data {
                    ColumnData::Numeric(_) => DataType::Float64,
                    ColumnData::Textual(_) => DataType::Utf8,
                };
                Field::new(column.name.as_str(), data_type, true)
            })
            .collect();
        Arc::new(Schema::new(fields))
    }

    pub(super) fn record_batch(table: &Table) -> Result<RecordBatch> {
        let arrays: Vec<ArrayRef> = table
            .columns()
            .iter()
            .map(|column| -> ArrayRef {
                match &column.data {
                    ColumnData::Numeric(values) => Arc::new(Float64Array::from(values.clone())),
                    ColumnData::Textual(values) => Arc::new(
                        values
                            .iter()
                            .map(|v| v.as_deref())
                            .collect::<StringArray>(),
                    ),
                }
            })
            .collect();

        let options = RecordBatchOptions::new().with_row_count(Some(table.num_rows()));
        Ok(RecordBatch::try_new_with_options(
            schema_for(table),
            arrays,
            &options,
        )?)
    }

    pub(super) fn encode_parquet(table: &Table) -> Result<Vec<u8>> {
        let batch = record_batch(table)?;
        let mut buffer = Vec::new();

        let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(writer_properties()))
            .map_err(|e| EtlError::WriteError {
                message: format!("parquet writer init failed: {}", e),
            })?;
        writer.write(&batch).map_err(|e| EtlError::WriteError {
            message: format!("parquet write failed: {}", e),
        })?;
        writer.close().map_err(|e| EtlError::WriteError {
            message: format!("parquet close failed: {}", e),
        })?;

        Ok(buffer)
    }
}
