use crate::config::DEFAULT_CRAWLER_NAME;
use crate::core::paths::{DEFAULT_DESTINATION_PREFIX, DEFAULT_SOURCE_PREFIX};
use crate::core::{ConfigProvider, OutputFormat};
use crate::utils::error::{EtlError, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub source_prefix: String,
    pub destination_prefix: String,
    pub crawler_name: String,
    pub output_format: OutputFormat,
    pub s3_region: Option<String>,
    pub s3_force_path_style: bool,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source; unset values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let output_format = match lookup("OUTPUT_FORMAT") {
            Some(value) => value.parse()?,
            None => OutputFormat::detect(),
        };

        let s3_force_path_style = match lookup("S3_FORCE_PATH_STYLE") {
            Some(value) => parse_bool("S3_FORCE_PATH_STYLE", &value)?,
            None => false,
        };

        Ok(Self {
            source_prefix: lookup("SOURCE_PREFIX")
                .unwrap_or_else(|| DEFAULT_SOURCE_PREFIX.to_string()),
            destination_prefix: lookup("DESTINATION_PREFIX")
                .unwrap_or_else(|| DEFAULT_DESTINATION_PREFIX.to_string()),
            crawler_name: lookup("CRAWLER_NAME")
                .unwrap_or_else(|| DEFAULT_CRAWLER_NAME.to_string()),
            output_format,
            s3_region: lookup("S3_REGION").filter(|r| !r.is_empty()),
            s3_force_path_style,
        })
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(EtlError::InvalidConfigValueError {
            field: field.to_string(),
            value: other.to_string(),
            reason: "Expected true or false".to_string(),
        }),
    }
}

impl ConfigProvider for LambdaConfig {
    fn source_prefix(&self) -> &str {
        &self.source_prefix
    }

    fn destination_prefix(&self) -> &str {
        &self.destination_prefix
    }

    fn crawler_name(&self) -> &str {
        &self.crawler_name
    }

    fn output_format(&self) -> OutputFormat {
        self.output_format
    }
}

impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        // 驗證路徑前綴
        validate_key_prefix("SOURCE_PREFIX", &self.source_prefix)?;
        validate_key_prefix("DESTINATION_PREFIX", &self.destination_prefix)?;

        // 驗證 crawler 名稱
        validate_non_empty_string("CRAWLER_NAME", &self.crawler_name)?;

        validate_output_format("OUTPUT_FORMAT", self.output_format)?;

        // 驗證區域
        if let Some(region) = &self.s3_region {
            validate_aws_region("S3_REGION", region)?;
        }

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
