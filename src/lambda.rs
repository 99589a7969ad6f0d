use aws_config::BehaviorVersion;
use csv_lake_etl::utils::{logger, validation::Validate};
use csv_lake_etl::{
    ConversionPipeline, EtlEngine, GlueCatalog, InvocationResult, LambdaConfig, S3Event,
    S3Storage,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

type Engine = EtlEngine<ConversionPipeline<S3Storage, GlueCatalog, LambdaConfig>>;

async fn function_handler(
    engine: &Engine,
    event: LambdaEvent<S3Event>,
) -> Result<InvocationResult, Error> {
    tracing::debug!("Request id: {}", event.context.request_id);
    let result = engine.run(&event.payload).await;
    tracing::info!("Invocation result: {:?}", result);
    Ok(result)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 創建Lambda配置
    let lambda_config = LambdaConfig::from_env()?;
    lambda_config.validate()?;

    // 創建AWS配置和客戶端 (冷啟動時一次)
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(lambda_config.s3_force_path_style);
    if let Some(region) = &lambda_config.s3_region {
        s3_config = s3_config.region(aws_sdk_s3::config::Region::new(region.clone()));
    }
    let s3_client = aws_sdk_s3::Client::from_conf(s3_config.build());
    let glue_client = aws_sdk_glue::Client::new(&sdk_config);

    // 創建存儲和管道
    let storage = S3Storage::new(s3_client);
    let catalog = GlueCatalog::new(glue_client);
    let pipeline = ConversionPipeline::new(storage, catalog, lambda_config);
    let engine = EtlEngine::new(pipeline);
    let engine = &engine;

    run(service_fn(move |event: LambdaEvent<S3Event>| async move {
        function_handler(engine, event).await
    }))
    .await
}
