//! Object store client facade.
//!
//! Every operation maps onto a single backend call, except
//! [`ObjectStoreClient::compute_storage_usage`] which lists the buckets and then
//! each bucket once. Nothing is retried or cached, and failures are returned
//! as-is.

use crate::config::{R2Config, DEFAULT_USAGE_CONCURRENCY};
use crate::error::{R2Error, R2Result};
use crate::providers::ObjectBackend;
use crate::r2::R2Backend;
use crate::types::{Bucket, ObjectRecord, StorageUsageReport};
use futures_util::stream::{self, StreamExt, TryStreamExt};
use log::debug;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Lifetime of every presigned URL
pub const PRESIGNED_URL_TTL: Duration = Duration::from_secs(3600);

#[derive(Clone)]
pub struct ObjectStoreClient {
    backend: Arc<dyn ObjectBackend>,
    usage_concurrency: usize,
}

impl std::fmt::Debug for ObjectStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreClient")
            .field("usage_concurrency", &self.usage_concurrency)
            .finish_non_exhaustive()
    }
}

impl ObjectStoreClient {
    /// Validate `config` and build an R2 client. No request is sent.
    pub fn new(config: &R2Config) -> R2Result<Self> {
        config.validate()?;
        let backend = R2Backend::new(config)?;
        Ok(Self {
            backend: Arc::new(backend),
            usage_concurrency: config.usage_concurrency(),
        })
    }

    pub fn with_backend(backend: impl ObjectBackend) -> Self {
        Self::from_shared(Arc::new(backend))
    }

    pub fn from_shared(backend: Arc<dyn ObjectBackend>) -> Self {
        Self {
            backend,
            usage_concurrency: DEFAULT_USAGE_CONCURRENCY,
        }
    }

    /// Buckets listed at once by `compute_storage_usage` (at least 1).
    pub fn with_usage_concurrency(mut self, concurrency: usize) -> Self {
        self.usage_concurrency = concurrency.max(1);
        self
    }

    pub async fn list_buckets(&self) -> R2Result<Vec<Bucket>> {
        debug!("list_buckets");
        self.backend.list_buckets().await
    }

    pub async fn list_bucket_names(&self) -> R2Result<Vec<String>> {
        let buckets = self.list_buckets().await?;
        Ok(buckets.into_iter().map(|b| b.name).collect())
    }

    pub async fn list_objects(&self, bucket: &str) -> R2Result<Vec<ObjectRecord>> {
        debug!("list_objects: bucket={}", bucket);
        self.backend.list_objects(bucket).await
    }

    /// Presigned GET URL valid for [`PRESIGNED_URL_TTL`].
    pub async fn generate_presigned_url(&self, bucket: &str, key: &str) -> R2Result<String> {
        debug!("generate_presigned_url: {}/{}", bucket, key);
        self.backend
            .presign_get(bucket, key, PRESIGNED_URL_TTL)
            .await
    }

    pub async fn delete_object(&self, bucket: &str, key: &str) -> R2Result<()> {
        debug!("delete_object: {}/{}", bucket, key);
        self.backend.delete_object(bucket, key).await
    }

    pub async fn download_object(
        &self,
        bucket: &str,
        key: &str,
        destination: &Path,
    ) -> R2Result<()> {
        debug!(
            "download_object: {}/{} -> {}",
            bucket,
            key,
            destination.display()
        );
        self.backend.download_object(bucket, key, destination).await
    }

    pub async fn upload_object(&self, bucket: &str, key: &str, source: &Path) -> R2Result<()> {
        debug!("upload_object: {} -> {}/{}", source.display(), bucket, key);
        self.backend.upload_object(bucket, key, source).await
    }

    /// Total object bytes per bucket.
    ///
    /// One bucket listing plus one object listing per bucket, at most
    /// `usage_concurrency` in flight. The first failing bucket aborts the
    /// whole report.
    pub async fn compute_storage_usage(&self) -> R2Result<StorageUsageReport> {
        let names = self.list_bucket_names().await?;
        debug!(
            "compute_storage_usage: buckets={} concurrency={}",
            names.len(),
            self.usage_concurrency
        );

        let backend = self.backend.clone();
        let sizes: Vec<(String, u64)> = stream::iter(names)
            .map(move |name| {
                let backend = backend.clone();
                async move {
                    let objects = backend.list_objects(&name).await?;
                    let total: u64 = objects.iter().map(|o| o.size).sum();
                    Ok::<_, R2Error>((name, total))
                }
            })
            .buffered(self.usage_concurrency)
            .try_collect()
            .await?;

        Ok(sizes.into_iter().collect())
    }
}
