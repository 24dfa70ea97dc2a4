//! R2 upload (single PUT)

use crate::error::{R2Error, R2Result};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;

/// Upload a local file as one object, overwriting any existing one.
pub async fn upload_file(client: &Client, bucket: &str, key: &str, file_path: &Path) -> R2Result<()> {
    // Surface an unreadable source as a local error before any request is made
    tokio::fs::File::open(file_path).await?;

    let body = ByteStream::from_path(file_path)
        .await
        .map_err(|e| R2Error::Io(std::io::Error::other(e)))?;

    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(body)
        .send()
        .await
        .map_err(|e| R2Error::from_sdk(&format!("upload {}/{}", bucket, key), e))?;

    Ok(())
}
