use crate::dto::DataFile;
use crate::error::ServiceError;
use futures::stream::TryStreamExt;
use rusoto_core::Region;
use rusoto_s3::{GetObjectRequest, PutObjectRequest, S3Client, S3};
use std::env;
use std::str::FromStr;
use tracing::debug;

pub fn get_region() -> Result<Region, ServiceError> {
    let name = env::var("REGION").map_err(|_| {
        ServiceError::internal_server_error("Environment variable 'REGION' not found")
    })?;
    Region::from_str(&name)
        .map_err(|_| ServiceError::internal_server_error(format!("Unable to parse region {name}")))
}

pub async fn download_object_from_s3(
    client: &S3Client,
    file: &DataFile,
) -> Result<Vec<u8>, ServiceError> {
    let request = GetObjectRequest {
        bucket: file.bucket.clone(),
        key: file.key.clone(),
        ..Default::default()
    };
    let mut object = client
        .get_object(request)
        .await
        .map_err(|err| {
            ServiceError::internal_server_error(format!(
                "Unable to fetch s3://{}/{}: {err}",
                file.bucket, file.key
            ))
        })?;
    let body = object
        .body
        .take()
        .ok_or_else(|| ServiceError::internal_server_error("Unable to extract body"))?;
    let bytes: Vec<u8> = body
        .map_ok(|b| b.to_vec())
        .try_concat()
        .await
        .map_err(ServiceError::internal_server_error)?;
    debug!(bucket = %file.bucket, key = %file.key, bytes = bytes.len(), "Object downloaded");
    Ok(bytes)
}

pub async fn upload_object_to_s3(
    client: &S3Client,
    object: Vec<u8>,
    file: &DataFile,
    content_type: &str,
) -> Result<(), ServiceError> {
    let size = object.len();
    let request = PutObjectRequest {
        bucket: file.bucket.clone(),
        key: file.key.clone(),
        body: Some(object.into()),
        content_type: Some(content_type.to_string()),
        ..Default::default()
    };
    client
        .put_object(request)
        .await
        .map_err(ServiceError::internal_server_error)?;
    debug!(bucket = %file.bucket, key = %file.key, bytes = size, "Object uploaded");
    Ok(())
}
