//! R2 object operations (delete)

use crate::error::{R2Error, R2Result};
use aws_sdk_s3::Client;

/// Delete a single object. S3 answers 204 for missing keys too.
pub async fn delete_object(client: &Client, bucket: &str, key: &str) -> R2Result<()> {
    client
        .delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| R2Error::from_sdk(&format!("delete {}/{}", bucket, key), e))?;
    Ok(())
}
