use clap::Parser;
use csv_lake_etl::core::ConfigProvider;
use csv_lake_etl::utils::{logger, validation::Validate};
use csv_lake_etl::{
    CliConfig, ConversionPipeline, EtlEngine, InvocationResult, LocalStorage, LoggingCatalog,
    S3Event, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting csv-lake-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_invalid_config(&e);
    }

    let event = config
        .notification()
        .unwrap_or_else(|e| exit_invalid_config(&e));
    let settings = config
        .settings()
        .unwrap_or_else(|e| exit_invalid_config(&e));

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let result = run(&config, settings, &event).await;

    println!("{}", serde_json::to_string_pretty(&result)?);

    match &result {
        InvocationResult::Success { output } => {
            tracing::info!("📁 Output saved to: {}", output);
        }
        InvocationResult::Skipped { message } => {
            tracing::info!("Nothing to do: {}", message);
        }
        InvocationResult::Error { message } => {
            eprintln!("❌ {}", message);
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn run(cli: &CliConfig, settings: TomlConfig, event: &S3Event) -> InvocationResult {
    tracing::debug!(
        "Converting with source_prefix={}, destination_prefix={}, crawler={}, format={}",
        settings.source_prefix(),
        settings.destination_prefix(),
        settings.crawler_name(),
        settings.output_format()
    );

    // 創建存儲和管道
    let storage = LocalStorage::new(cli.storage_root.clone());
    let pipeline = ConversionPipeline::new(storage, LoggingCatalog, settings);

    let engine = EtlEngine::new_with_monitoring(pipeline, cli.monitor);
    engine.run(event).await
}

fn exit_invalid_config(e: &csv_lake_etl::EtlError) -> ! {
    tracing::error!(
        "❌ Configuration validation failed: {} (Category: {:?})",
        e,
        e.category()
    );
    eprintln!("❌ {}", e);
    std::process::exit(2);
}
