//! R2 presigned URL generation

use crate::error::{R2Error, R2Result};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use std::time::Duration;

/// Generate a presigned URL for object access
pub async fn generate_presigned_url(
    client: &Client,
    bucket: &str,
    key: &str,
    expires_in: Duration,
) -> R2Result<String> {
    let presigning_config =
        PresigningConfig::expires_in(expires_in).map_err(|e| R2Error::from_sdk("presign", e))?;

    let presigned_request = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .presigned(presigning_config)
        .await
        .map_err(|e| R2Error::from_sdk(&format!("presign {}/{}", bucket, key), e))?;

    Ok(presigned_request.uri().to_string())
}
