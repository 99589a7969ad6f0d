pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{LambdaConfig, TomlConfig};

pub use crate::adapters::{LocalStorage, LoggingCatalog};
#[cfg(feature = "lambda")]
pub use crate::adapters::{GlueCatalog, S3Storage};

pub use crate::core::{etl::EtlEngine, pipeline::ConversionPipeline};
pub use crate::domain::event::S3Event;
pub use crate::domain::model::{InvocationResult, OutputFormat};
pub use crate::utils::error::{EtlError, Result};
