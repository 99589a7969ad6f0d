use crate::config::TomlConfig;
use crate::core::{OutputFormat, S3Event};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "csv-lake-etl")]
#[command(about = "Convert one CSV object from a local bucket directory into the data lake layout")]
pub struct CliConfig {
    #[arg(long, default_value = "./data", help = "Directory holding one sub-directory per bucket")]
    pub storage_root: String,

    #[arg(long, help = "Source bucket name")]
    pub bucket: Option<String>,

    #[arg(long, help = "Source object key")]
    pub key: Option<String>,

    #[arg(long, help = "S3 notification JSON file; replaces --bucket/--key")]
    pub event: Option<String>,

    #[arg(long, help = "TOML file with [paths], [catalog] and [output] settings")]
    pub config: Option<String>,

    #[arg(long, help = "Overrides [paths] source_prefix (default customer-dataCSV-incoming/)")]
    pub source_prefix: Option<String>,

    #[arg(long, help = "Overrides [paths] destination_prefix (default Customer-dataLake-parquet/)")]
    pub destination_prefix: Option<String>,

    #[arg(long, help = "Overrides [catalog] crawler_name")]
    pub crawler_name: Option<String>,

    #[arg(long, help = "parquet or csv (defaults to parquet when compiled in)")]
    pub output_format: Option<OutputFormat>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage after each stage")]
    pub monitor: bool,
}

impl CliConfig {
    /// The notification to process: read from `--event` or built from `--bucket`/`--key`.
    pub fn notification(&self) -> Result<S3Event> {
        if let Some(path) = &self.event {
            let content = std::fs::read_to_string(path).map_err(|e| EtlError::ConfigError {
                message: format!("Cannot read event file {}: {}", path, e),
            })?;
            return serde_json::from_str(&content).map_err(|e| EtlError::ConfigError {
                message: format!("Invalid event file {}: {}", path, e),
            });
        }

        use crate::utils::validation::validate_required_field;
        let bucket = validate_required_field("bucket", &self.bucket)?;
        let key = validate_required_field("key", &self.key)?;
        Ok(S3Event::for_object(bucket.clone(), key.clone()))
    }

    /// Settings for the run: the `--config` file (or defaults) with any
    /// explicitly passed flag taking precedence, validated.
    pub fn settings(&self) -> Result<TomlConfig> {
        let mut settings = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        // 命令列參數優先於設定檔
        if let Some(prefix) = &self.source_prefix {
            settings.paths.source_prefix = prefix.clone();
        }
        if let Some(prefix) = &self.destination_prefix {
            settings.paths.destination_prefix = prefix.clone();
        }
        if let Some(name) = &self.crawler_name {
            settings.catalog.crawler_name = name.clone();
        }
        if let Some(format) = self.output_format {
            settings.output.format = format;
        }

        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_path("storage_root", &self.storage_root)?;

        if let Some(event) = &self.event {
            validate_path("event", event)?;
            if self.bucket.is_some() || self.key.is_some() {
                return Err(EtlError::ConfigError {
                    message: "--event cannot be combined with --bucket/--key".to_string(),
                });
            }
        } else {
            let bucket = validate_required_field("bucket", &self.bucket)?;
            validate_s3_bucket_name("bucket", bucket)?;
            let key = validate_required_field("key", &self.key)?;
            validate_non_empty_string("key", key)?;
        }

        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }

        if let Some(prefix) = &self.source_prefix {
            validate_key_prefix("source_prefix", prefix)?;
        }
        if let Some(prefix) = &self.destination_prefix {
            validate_key_prefix("destination_prefix", prefix)?;
        }
        if let Some(name) = &self.crawler_name {
            validate_non_empty_string("crawler_name", name)?;
        }
        if let Some(format) = self.output_format {
            validate_output_format("output_format", format)?;
        }
        Ok(())
    }
}
