use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Failed to fetch object: {message}")]
    FetchError { message: String },

    #[error("Failed to write object: {message}")]
    WriteError { message: String },

    #[error("Failed to notify catalog: {message}")]
    NotifyError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[cfg(feature = "parquet")]
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Which part of an invocation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Object retrieval or parsing.
    Fetch,
    /// Serialization or store.
    Write,
    /// Catalog trigger, never fatal.
    Notify,
    Config,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::FetchError { .. }
            | EtlError::CsvError(_)
            | EtlError::ProcessingError { .. } => ErrorCategory::Fetch,
            EtlError::WriteError { .. } | EtlError::IoError(_) | EtlError::SerializationError(_) => {
                ErrorCategory::Write
            }
            #[cfg(feature = "parquet")]
            EtlError::ArrowError(_) => ErrorCategory::Write,
            EtlError::NotifyError { .. } => ErrorCategory::Notify,
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Config,
        }
    }

    /// Notify failures are logged and swallowed; everything else ends the invocation.
    pub fn is_fatal(&self) -> bool {
        self.category() != ErrorCategory::Notify
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
