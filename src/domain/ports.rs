use crate::domain::model::{ObjectRef, OutputFormat, Table};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Metadata catalog that can be asked to re-crawl stored objects.
pub trait Catalog: Send + Sync {
    fn start_crawl(&self, name: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source_prefix(&self) -> &str;
    fn destination_prefix(&self) -> &str;
    fn crawler_name(&self) -> &str;
    fn output_format(&self) -> OutputFormat;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, object: &ObjectRef) -> Result<Table>;
    async fn transform(&self, table: Table) -> Table;
    async fn load(&self, object: &ObjectRef, table: Table) -> Result<String>;
    async fn notify(&self) -> Result<()>;
}
