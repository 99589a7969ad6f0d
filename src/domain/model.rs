use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Location of one object in the storage service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Column values, typed once at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Textual(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Textual(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_null(&self, row: usize) -> bool {
        match self {
            ColumnData::Numeric(values) => values[row].is_none(),
            ColumnData::Textual(values) => values[row].is_none(),
        }
    }

    pub fn null_count(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Textual(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnData::Numeric(_))
    }

    /// Keeps only the rows whose flag in `keep` is set.
    fn retain(&mut self, keep: &[bool]) {
        fn retain_flagged<T>(values: &mut Vec<T>, keep: &[bool]) {
            let mut flags = keep.iter();
            values.retain(|_| *flags.next().unwrap_or(&false));
        }
        match self {
            ColumnData::Numeric(values) => retain_flagged(values, keep),
            ColumnData::Textual(values) => retain_flagged(values, keep),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn textual(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Textual(values),
        }
    }
}

/// One cell viewed for row comparison. Nulls compare equal to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell<'a> {
    Null,
    Number(u64),
    Text(&'a str),
}

/// In-memory table with typed columns. Every column holds `num_rows` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let num_rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        if let Some(ragged) = columns.iter().find(|c| c.data.len() != num_rows) {
            return Err(EtlError::ProcessingError {
                message: format!(
                    "Column '{}' has {} rows, expected {}",
                    ragged.name,
                    ragged.data.len(),
                    num_rows
                ),
            });
        }
        Ok(Self { columns, num_rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn null_count(&self) -> usize {
        self.columns.iter().map(|c| c.data.null_count()).sum()
    }

    pub fn row(&self, index: usize) -> Vec<Cell<'_>> {
        self.columns
            .iter()
            .map(|column| match &column.data {
                ColumnData::Numeric(values) => match values[index] {
                    // -0.0 and 0.0 are the same value
                    Some(v) if v == 0.0 => Cell::Number(0f64.to_bits()),
                    Some(v) => Cell::Number(v.to_bits()),
                    None => Cell::Null,
                },
                ColumnData::Textual(values) => match &values[index] {
                    Some(v) => Cell::Text(v.as_str()),
                    None => Cell::Null,
                },
            })
            .collect()
    }

    pub fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.num_rows);
        for column in &mut self.columns {
            column.data.retain(keep);
        }
        self.num_rows = keep.iter().filter(|k| **k).count();
    }
}

/// Serializer used for the output object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Parquet,
    Csv,
}

impl OutputFormat {
    /// Parquet when the encoder is compiled in, CSV otherwise.
    pub fn detect() -> Self {
        if cfg!(feature = "parquet") {
            OutputFormat::Parquet
        } else {
            OutputFormat::Csv
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Parquet => ".parquet",
            OutputFormat::Csv => ".csv",
        }
    }

    pub fn is_available(&self) -> bool {
        match self {
            OutputFormat::Parquet => cfg!(feature = "parquet"),
            OutputFormat::Csv => true,
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::detect()
    }
}

impl FromStr for OutputFormat {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parquet" => Ok(OutputFormat::Parquet),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(EtlError::InvalidConfigValueError {
                field: "output_format".to_string(),
                value: other.to_string(),
                reason: "Supported formats: parquet, csv".to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Parquet => f.write_str("parquet"),
            OutputFormat::Csv => f.write_str("csv"),
        }
    }
}

/// What an invocation reports back to its trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InvocationResult {
    Success { output: String },
    Skipped { message: String },
    Error { message: String },
}

impl InvocationResult {
    pub fn success(output: impl Into<String>) -> Self {
        InvocationResult::Success {
            output: output.into(),
        }
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        InvocationResult::Skipped {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        InvocationResult::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, InvocationResult::Error { .. })
    }
}
