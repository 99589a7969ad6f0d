use csv_lake_etl::core::{Catalog, ConfigProvider};
use csv_lake_etl::{
    ConversionPipeline, EtlEngine, EtlError, InvocationResult, LocalStorage, OutputFormat,
    S3Event, TomlConfig,
};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const BUCKET: &str = "bank-data";

#[derive(Clone, Default)]
struct RecordingCatalog {
    crawls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingCatalog {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn crawls(&self) -> Vec<String> {
        self.crawls.lock().unwrap().clone()
    }
}

impl Catalog for RecordingCatalog {
    async fn start_crawl(&self, name: &str) -> csv_lake_etl::Result<()> {
        self.crawls.lock().unwrap().push(name.to_string());
        if self.fail {
            return Err(EtlError::NotifyError {
                message: "CrawlerRunningException".to_string(),
            });
        }
        Ok(())
    }
}

struct Fixture {
    temp_dir: TempDir,
    catalog: RecordingCatalog,
}

impl Fixture {
    fn new() -> Self {
        Self::with_catalog(RecordingCatalog::default())
    }

    fn with_catalog(catalog: RecordingCatalog) -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
            catalog,
        }
    }

    fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    fn put(&self, key: &str, content: &[u8]) {
        let path = self.root().join(BUCKET).join(key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn read(&self, key: &str) -> Option<Vec<u8>> {
        std::fs::read(self.root().join(BUCKET).join(key)).ok()
    }

    fn output_dir_exists(&self) -> bool {
        self.root().join(BUCKET).join("Customer-dataLake-parquet").exists()
    }

    fn engine<C: ConfigProvider>(
        &self,
        config: C,
    ) -> EtlEngine<ConversionPipeline<LocalStorage, RecordingCatalog, C>> {
        let storage = LocalStorage::new(self.root().to_str().unwrap().to_string());
        EtlEngine::new(ConversionPipeline::new(storage, self.catalog.clone(), config))
    }
}

fn csv_config() -> TomlConfig {
    TomlConfig::from_toml_str("[output]\nformat = \"csv\"\n").unwrap()
}

#[tokio::test]
async fn test_end_to_end_csv_fallback() {
    let fixture = Fixture::new();
    fixture.put(
        "customer-dataCSV-incoming/2024/accounts.csv",
        b"id,name\n1,A\n1,A\n2,\n",
    );

    let result = fixture
        .engine(csv_config())
        .run(&S3Event::for_object(
            BUCKET,
            "customer-dataCSV-incoming/2024/accounts.csv",
        ))
        .await;

    assert_eq!(
        result,
        InvocationResult::success("Customer-dataLake-parquet/2024/accounts.csv")
    );
    let written = fixture
        .read("Customer-dataLake-parquet/2024/accounts.csv")
        .unwrap();
    assert_eq!(String::from_utf8(written).unwrap(), "id,name\n1,A\n2,unknown\n");
    assert_eq!(fixture.catalog.crawls(), vec!["bank-cutomers-crwlr".to_string()]);
}

#[cfg(feature = "parquet")]
#[tokio::test]
async fn test_end_to_end_parquet_output() {
    use arrow::array::{Array, Float64Array, StringArray};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    let fixture = Fixture::new();
    fixture.put(
        "uploads/daily/customers.csv",
        b"id,name,balance\n1,Ann,10.5\n1,Ann,10.5\n2,,\n,,\n3,Cid,7\n",
    );

    let result = fixture
        .engine(TomlConfig::default())
        .run(&S3Event::for_object(BUCKET, "uploads/daily/customers.csv"))
        .await;

    assert_eq!(
        result,
        InvocationResult::success("Customer-dataLake-parquet/customers.parquet")
    );

    let bytes = fixture
        .read("Customer-dataLake-parquet/customers.parquet")
        .unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(bytes::Bytes::from(bytes))
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.map(|b| b.unwrap()).collect();
    let batch = &batches[0];

    assert_eq!(batch.num_rows(), 3);
    let ids = batch
        .column(0)
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(ids.values().to_vec(), vec![1.0, 2.0, 3.0]);
    let names = batch
        .column(1)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(names.value(1), "unknown");
    let balances = batch
        .column(2)
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(balances.value(1), 0.0);
    assert_eq!(balances.null_count(), 0);
}

#[tokio::test]
async fn test_non_csv_key_is_skipped() {
    let fixture = Fixture::new();
    fixture.put("customer-dataCSV-incoming/readme.txt", b"hello");

    let result = fixture
        .engine(csv_config())
        .run(&S3Event::for_object(
            BUCKET,
            "customer-dataCSV-incoming/readme.txt",
        ))
        .await;

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!({"status": "skipped", "message": "Not a CSV file"})
    );
    assert!(!fixture.output_dir_exists());
    assert!(fixture.catalog.crawls().is_empty());
}

#[tokio::test]
async fn test_uppercase_extension_is_converted() {
    let fixture = Fixture::new();
    fixture.put("drop/REPORT.CSV", b"a\n1\n");

    let result = fixture
        .engine(csv_config())
        .run(&S3Event::for_object(BUCKET, "drop/REPORT.CSV"))
        .await;

    assert_eq!(
        result,
        InvocationResult::success("Customer-dataLake-parquet/REPORT.csv")
    );
}

#[tokio::test]
async fn test_missing_object_is_error_without_side_effects() {
    let fixture = Fixture::new();

    let result = fixture
        .engine(csv_config())
        .run(&S3Event::for_object(
            BUCKET,
            "customer-dataCSV-incoming/missing.csv",
        ))
        .await;

    assert!(result.is_error());
    assert!(!fixture.output_dir_exists());
    assert!(fixture.catalog.crawls().is_empty());
}

#[tokio::test]
async fn test_unparsable_csv_is_error_without_side_effects() {
    let fixture = Fixture::new();
    fixture.put("customer-dataCSV-incoming/bad.csv", b"a,b\n1,2\n3,4,5\n");

    let result = fixture
        .engine(csv_config())
        .run(&S3Event::for_object(BUCKET, "customer-dataCSV-incoming/bad.csv"))
        .await;

    match result {
        InvocationResult::Error { message } => {
            assert!(message.contains("Expected 2 fields in line 3, saw 3"));
        }
        other => panic!("expected error, got {:?}", other),
    }
    assert!(!fixture.output_dir_exists());
    assert!(fixture.catalog.crawls().is_empty());
}

#[tokio::test]
async fn test_catalog_failure_keeps_success() {
    let fixture = Fixture::with_catalog(RecordingCatalog::failing());
    fixture.put("customer-dataCSV-incoming/ok.csv", b"id\n1\n");

    let result = fixture
        .engine(csv_config())
        .run(&S3Event::for_object(BUCKET, "customer-dataCSV-incoming/ok.csv"))
        .await;

    assert_eq!(
        result,
        InvocationResult::success("Customer-dataLake-parquet/ok.csv")
    );
    assert_eq!(fixture.catalog.crawls().len(), 1);
    assert!(fixture.read("Customer-dataLake-parquet/ok.csv").is_some());
}

#[tokio::test]
async fn test_only_first_record_of_batch_is_processed() {
    let fixture = Fixture::new();
    fixture.put("customer-dataCSV-incoming/one.csv", b"id\n1\n");
    fixture.put("customer-dataCSV-incoming/two.csv", b"id\n2\n");

    let payload = serde_json::json!({
        "Records": [
            {"s3": {"bucket": {"name": BUCKET}, "object": {"key": "customer-dataCSV-incoming/one.csv"}}},
            {"s3": {"bucket": {"name": BUCKET}, "object": {"key": "customer-dataCSV-incoming/two.csv"}}}
        ]
    });
    let event: S3Event = serde_json::from_value(payload).unwrap();

    let result = fixture.engine(csv_config()).run(&event).await;

    assert_eq!(
        result,
        InvocationResult::success("Customer-dataLake-parquet/one.csv")
    );
    assert!(fixture.read("Customer-dataLake-parquet/two.csv").is_none());
    assert_eq!(fixture.catalog.crawls().len(), 1);
}

#[tokio::test]
async fn test_header_only_file_produces_empty_output() {
    let fixture = Fixture::new();
    fixture.put("customer-dataCSV-incoming/empty.csv", b"id,name\n");

    let result = fixture
        .engine(csv_config())
        .run(&S3Event::for_object(
            BUCKET,
            "customer-dataCSV-incoming/empty.csv",
        ))
        .await;

    assert!(result.is_success());
    assert_eq!(
        fixture.read("Customer-dataLake-parquet/empty.csv").unwrap(),
        b"id,name\n"
    );
}

#[tokio::test]
async fn test_custom_prefixes_and_crawler() {
    let fixture = Fixture::new();
    fixture.put("raw/eu/sales.csv", b"amount\n5\n");

    let config = TomlConfig::from_toml_str(
        r#"
[paths]
source_prefix = "raw/"
destination_prefix = "curated/"

[catalog]
crawler_name = "sales-crawler"

[output]
format = "csv"
"#,
    )
    .unwrap();
    assert_eq!(config.output_format(), OutputFormat::Csv);

    let result = fixture
        .engine(config)
        .run(&S3Event::for_object(BUCKET, "raw/eu/sales.csv"))
        .await;

    assert_eq!(result, InvocationResult::success("curated/eu/sales.csv"));
    assert_eq!(fixture.catalog.crawls(), vec!["sales-crawler".to_string()]);
}
