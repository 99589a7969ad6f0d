use crate::core::{cleaner, encoder, loader, paths};
use crate::core::{Catalog, ConfigProvider, ObjectRef, Pipeline, Storage, Table};
use crate::utils::error::Result;

/// CSV to columnar conversion for one stored object.
pub struct ConversionPipeline<S: Storage, K: Catalog, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) catalog: K,
    pub(crate) config: C,
}

impl<S: Storage, K: Catalog, C: ConfigProvider> ConversionPipeline<S, K, C> {
    pub fn new(storage: S, catalog: K, config: C) -> Self {
        Self {
            storage,
            catalog,
            config,
        }
    }

    pub fn target_key(&self, key: &str) -> String {
        paths::target_key(
            key,
            self.config.source_prefix(),
            self.config.destination_prefix(),
            self.config.output_format(),
        )
    }
}

#[async_trait::async_trait]
impl<S: Storage, K: Catalog, C: ConfigProvider> Pipeline for ConversionPipeline<S, K, C> {
    async fn extract(&self, object: &ObjectRef) -> Result<Table> {
        tracing::debug!("Fetching {}", object);
        let bytes = self.storage.read_file(&object.bucket, &object.key).await?;
        tracing::debug!("Fetched {} bytes", bytes.len());

        let table = loader::parse_csv(&bytes)?;
        tracing::info!(
            "CSV read successfully. Rows: {}, columns: {}",
            table.num_rows(),
            table.num_columns()
        );
        Ok(table)
    }

    async fn transform(&self, mut table: Table) -> Table {
        let rows_before = table.num_rows();
        let report = cleaner::clean(&mut table);

        tracing::debug!("Cleaning report: {:?}", report);
        tracing::info!(
            "Cleaning done. Rows after cleaning: {} (was {})",
            table.num_rows(),
            rows_before
        );
        table
    }

    async fn load(&self, object: &ObjectRef, table: Table) -> Result<String> {
        let format = self.config.output_format();
        let target_key = self.target_key(&object.key);
        tracing::info!("Target key for processed file: {}", target_key);

        let data = encoder::encode(&table, format)?;
        tracing::debug!("Encoded {} rows as {} ({} bytes)", table.num_rows(), format, data.len());

        self.storage
            .write_file(&object.bucket, &target_key, &data)
            .await?;

        tracing::info!("{} file uploaded successfully", format);
        Ok(target_key)
    }

    async fn notify(&self) -> Result<()> {
        let crawler = self.config.crawler_name();
        self.catalog.start_crawl(crawler).await?;
        tracing::info!("Crawler '{}' requested", crawler);
        Ok(())
    }
}
