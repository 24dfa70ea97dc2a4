//! R2 download, streamed to a local file

use crate::error::{R2Error, R2Result};
use aws_sdk_s3::Client;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Sibling path the body is streamed into before it replaces `destination`.
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(destination.file_name().unwrap_or_default());
    name.push(".part");
    destination.with_file_name(name)
}

/// Download one object. An existing file at `destination` is only replaced
/// once the whole body has been written.
pub async fn download_file(
    client: &Client,
    bucket: &str,
    key: &str,
    destination: &Path,
) -> R2Result<()> {
    let response = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| R2Error::from_sdk(&format!("download {}/{}", bucket, key), e))?;

    // Create parent directories if needed
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let partial = partial_path(destination);
    let mut file = File::create(&partial).await?;
    let mut body = response.body;

    let result = async {
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| R2Error::transport(format!("download {}/{}: {}", bucket, key, e)))?
        {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        drop(file);
        tokio::fs::rename(&partial, destination).await?;
        Ok::<(), R2Error>(())
    }
    .await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(&partial).await;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::partial_path;
    use std::path::Path;

    #[test]
    fn partial_file_sits_next_to_destination() {
        assert_eq!(
            partial_path(Path::new("/tmp/out/b.txt")),
            Path::new("/tmp/out/.b.txt.part")
        );
        assert_eq!(partial_path(Path::new("b.txt")), Path::new(".b.txt.part"));
    }
}
