mod util;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use lazy_static::lazy_static;
use provider_fusion_service::dto::FusionConfig;
use provider_fusion_service::error::ServiceError;
use provider_fusion_service::pipeline::FusionPipeline;
use provider_fusion_service::response::make_response_payload;
use provider_fusion_service::util::get_region;
use rusoto_core::{Client, Region};
use rusoto_s3::S3Client;
use serde_json::Value;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

lazy_static! {
    // AWS Region
    static ref REGION: Result<Region, ServiceError> = get_region();
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .without_time()
        .init();
    run(service_fn(process)).await?;
    Ok(())
}

async fn process(event: LambdaEvent<FusionConfig>) -> Result<Value, Error> {
    let (config, _context) = event.into_parts();
    let result = fuse(config).await;
    make_response_payload(result)
}

async fn fuse(config: FusionConfig) -> Result<Value, ServiceError> {
    if config.sources.is_empty() {
        return Err(ServiceError::bad_request("at least one source file is required"));
    }
    let region = REGION.clone()?;
    let client = S3Client::new_with_client(Client::shared(), region);

    let start = Instant::now();
    let records = util::pull_source_records(&client, &config.sources).await?;
    info!(
        records = records.len(),
        secs = start.elapsed().as_secs_f64(),
        "Source files downloaded"
    );

    let start = Instant::now();
    let pipeline = FusionPipeline::new(config.cluster_options(), config.priority_table());
    let output = pipeline.run(records)?;
    info!(
        entities = output.report.total_fused_entities,
        duplicates_removed = output.report.duplicates_removed,
        secs = start.elapsed().as_secs_f64(),
        "Fusion completed"
    );

    util::push_result_files(&client, &config, &output).await
}
