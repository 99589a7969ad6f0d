use crate::core::ingest::{is_csv_key, select_object, NOT_CSV_MESSAGE};
use crate::core::{InvocationResult, Pipeline, S3Event};
use crate::utils::monitor::SystemMonitor;

/// Drives one notification through the pipeline stages.
///
/// Every stage error is caught here and turned into an [`InvocationResult`];
/// nothing propagates to the caller. A failing catalog notification is logged
/// and does not change a successful result.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self, event: &S3Event) -> InvocationResult {
        let object = match select_object(event) {
            Ok(object) => object,
            Err(e) => {
                tracing::error!("Invalid notification: {}", e);
                return InvocationResult::error(e.to_string());
            }
        };

        tracing::info!("Lambda triggered for bucket: {}", object.bucket);
        tracing::info!("File key: {}", object.key);

        if !is_csv_key(&object.key) {
            tracing::info!("Skipping non-CSV file.");
            return InvocationResult::skipped(NOT_CSV_MESSAGE);
        }

        // Extract
        let table = match self.pipeline.extract(&object).await {
            Ok(table) => table,
            Err(e) => {
                tracing::error!("❌ Error reading CSV: {} (Category: {:?})", e, e.category());
                return InvocationResult::error(e.to_string());
            }
        };
        self.monitor.log_stats("Extract");

        // Transform
        let table = self.pipeline.transform(table).await;
        self.monitor.log_stats("Transform");

        // Load
        let target_key = match self.pipeline.load(&object, table).await {
            Ok(target_key) => target_key,
            Err(e) => {
                tracing::error!("❌ Error uploading file: {} (Category: {:?})", e, e.category());
                return InvocationResult::error(e.to_string());
            }
        };
        self.monitor.log_stats("Load");

        // 通知失敗不影響結果
        if let Err(e) = self.pipeline.notify().await {
            tracing::warn!("⚠️ Error starting crawler: {}", e);
        }
        self.monitor.log_final_stats();

        tracing::info!("✅ Conversion completed: {}", target_key);
        InvocationResult::success(target_key)
    }
}
