use crate::core::Catalog;
use crate::utils::error::Result;

#[cfg(feature = "lambda")]
use crate::utils::error::EtlError;
#[cfg(feature = "lambda")]
use aws_sdk_glue::error::DisplayErrorContext;
#[cfg(feature = "lambda")]
use aws_sdk_glue::operation::start_crawler::StartCrawlerError;
#[cfg(feature = "lambda")]
use aws_sdk_glue::Client as GlueClient;

/// Catalog used for local runs: records the request in the log only.
#[derive(Debug, Clone, Default)]
pub struct LoggingCatalog;

impl Catalog for LoggingCatalog {
    async fn start_crawl(&self, name: &str) -> Result<()> {
        tracing::info!("Crawler '{}' not started (no catalog service in local runs)", name);
        Ok(())
    }
}

#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct GlueCatalog {
    client: GlueClient,
}

#[cfg(feature = "lambda")]
impl GlueCatalog {
    pub fn new(client: GlueClient) -> Self {
        Self { client }
    }
}

#[cfg(feature = "lambda")]
impl Catalog for GlueCatalog {
    async fn start_crawl(&self, name: &str) -> Result<()> {
        self.client
            .start_crawler()
            .name(name)
            .send()
            .await
            .map_err(|e| {
                let message = match e.as_service_error() {
                    Some(StartCrawlerError::CrawlerRunningException(_)) => {
                        format!("Crawler '{}' is already running", name)
                    }
                    Some(StartCrawlerError::EntityNotFoundException(_)) => {
                        format!("Crawler '{}' does not exist", name)
                    }
                    _ => format!(
                        "Failed to start crawler '{}': {}",
                        name,
                        DisplayErrorContext(&e)
                    ),
                };
                EtlError::NotifyError { message }
            })?;
        tracing::info!("Crawler '{}' started", name);
        Ok(())
    }
}
