use csv::{Reader, Writer};
use provider_fusion_service::dto::{DataFile, FusionConfig, SourceFile};
use provider_fusion_service::error::ServiceError;
use provider_fusion_service::pipeline::FusionOutput;
use provider_fusion_service::record::{CanonicalEntity, RecordFields, SourceRecord};
use provider_fusion_service::source::Source;
use provider_fusion_service::util::{download_object_from_s3, upload_object_to_s3};
use rusoto_s3::S3Client;
use serde_json::{json, Value};
use tracing::info;

/// Downloads every source export and tags its rows, preserving file order.
pub async fn pull_source_records(
    client: &S3Client,
    sources: &[SourceFile],
) -> Result<Vec<SourceRecord>, ServiceError> {
    let mut records = Vec::new();
    for SourceFile { source, data } in sources {
        let bytes = download_object_from_s3(client, data).await?;
        let parsed = parse_records(&bytes, &Source::from(source.as_str()), &data.key)?;
        info!(source = %source, key = %data.key, records = parsed.len(), "Source file loaded");
        records.extend(parsed);
    }
    Ok(records)
}

/// Reads one CSV export. Columns outside the common field set are ignored and
/// empty cells are treated as absent.
pub fn parse_records(
    bytes: &[u8],
    source: &Source,
    file_key: &str,
) -> Result<Vec<SourceRecord>, ServiceError> {
    let mut reader = Reader::from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(ServiceError::internal_server_error)?
        .clone();
    reader
        .records()
        .enumerate()
        .map(|(row, record)| -> Result<SourceRecord, ServiceError> {
            let record = record.map_err(|err| {
                ServiceError::bad_request(format!("{file_key}: unreadable row {row}: {err}"))
            })?;
            let fields: RecordFields = record.deserialize(Some(&headers)).map_err(|err| {
                ServiceError::bad_request(format!("{file_key}: malformed row {row}: {err}"))
            })?;
            Ok(SourceRecord::new(source.clone(), file_key, row, fields))
        })
        .collect()
}

pub fn render_entities(entities: &[CanonicalEntity]) -> Result<Vec<u8>, ServiceError> {
    let mut writer = Writer::from_writer(vec![]);
    for entity in entities {
        writer
            .serialize(entity)
            .map_err(ServiceError::internal_server_error)?;
    }
    writer
        .into_inner()
        .map_err(ServiceError::internal_server_error)
}

pub fn render_clusters(output: &FusionOutput) -> Result<Vec<u8>, ServiceError> {
    let mut writer = Writer::from_writer(vec![]);
    writer
        .write_record(["recordId", "clusterId"])
        .map_err(ServiceError::internal_server_error)?;
    for (record_id, cluster_id) in output.cluster_rows() {
        writer
            .write_record(&[record_id, cluster_id])
            .map_err(ServiceError::internal_server_error)?;
    }
    writer
        .into_inner()
        .map_err(ServiceError::internal_server_error)
}

pub async fn push_result_files(
    client: &S3Client,
    config: &FusionConfig,
    output: &FusionOutput,
) -> Result<Value, ServiceError> {
    let entities = DataFile {
        bucket: config.output.bucket.clone(),
        key: config.output_key("canonical.csv"),
    };
    let clusters = DataFile {
        bucket: config.output.bucket.clone(),
        key: config.output_key("clusters.csv"),
    };
    let summary = DataFile {
        bucket: config.output.bucket.clone(),
        key: config.output_key("summary.json"),
    };
    upload_object_to_s3(client, render_entities(&output.entities)?, &entities, "text/csv").await?;
    upload_object_to_s3(client, render_clusters(output)?, &clusters, "text/csv").await?;
    let report =
        serde_json::to_vec_pretty(&output.report).map_err(ServiceError::internal_server_error)?;
    upload_object_to_s3(client, report, &summary, "application/json").await?;
    info!(bucket = %config.output.bucket, prefix = %config.output.key, "Results uploaded");
    Ok(json!({
        "bucket": config.output.bucket,
        "entities": entities.key,
        "clusters": clusters.key,
        "summary": output.report,
    }))
}
