//! In-process object store.
//!
//! Buckets and objects live in a map guarded by a tokio lock. Transfers still
//! go through the local filesystem so upload/download behave like the real
//! backend from the caller's point of view. A bucket can be marked as failing
//! to exercise error propagation.

use super::ObjectBackend;
use crate::error::{R2Error, R2Result};
use crate::types::{Bucket, ObjectRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    last_modified: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    buckets: RwLock<BTreeMap<String, BTreeMap<String, StoredObject>>>,
    failing: RwLock<HashSet<String>>,
    list_object_calls: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_bucket(&self, bucket: &str) {
        self.buckets
            .write()
            .await
            .entry(bucket.to_string())
            .or_default();
    }

    /// Store `data` under `key`, creating the bucket if needed.
    pub async fn put(&self, bucket: &str, key: &str, data: impl Into<Vec<u8>>) {
        let object = StoredObject {
            data: data.into(),
            last_modified: Utc::now(),
        };
        self.buckets
            .write()
            .await
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), object);
    }

    pub async fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.buckets
            .read()
            .await
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .map(|object| object.data.clone())
    }

    /// Make every call touching `bucket` fail with a transport error.
    pub async fn fail_bucket(&self, bucket: &str) {
        self.failing.write().await.insert(bucket.to_string());
    }

    /// Number of `list_objects` calls served so far
    pub fn list_object_calls(&self) -> usize {
        self.list_object_calls.load(Ordering::SeqCst)
    }

    async fn check_bucket(&self, bucket: &str) -> R2Result<()> {
        if self.failing.read().await.contains(bucket) {
            return Err(R2Error::transport(format!("bucket {} is unavailable", bucket)));
        }
        if !self.buckets.read().await.contains_key(bucket) {
            return Err(R2Error::transport(format!("NoSuchBucket: {}", bucket)));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectBackend for MemoryBackend {
    async fn list_buckets(&self) -> R2Result<Vec<Bucket>> {
        let buckets = self.buckets.read().await;
        Ok(buckets
            .keys()
            .map(|name| Bucket {
                name: name.clone(),
                creation_date: None,
            })
            .collect())
    }

    async fn list_objects(&self, bucket: &str) -> R2Result<Vec<ObjectRecord>> {
        self.list_object_calls.fetch_add(1, Ordering::SeqCst);
        self.check_bucket(bucket).await?;

        let buckets = self.buckets.read().await;
        let objects = buckets
            .get(bucket)
            .map(|objects| {
                objects
                    .iter()
                    .map(|(key, object)| {
                        ObjectRecord::new(key.clone(), object.data.len() as u64, object.last_modified)
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(objects)
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> R2Result<String> {
        self.check_bucket(bucket).await?;
        Ok(format!(
            "memory://{}/{}?X-Amz-Expires={}",
            bucket,
            key,
            expires_in.as_secs()
        ))
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> R2Result<()> {
        self.check_bucket(bucket).await?;
        if let Some(objects) = self.buckets.write().await.get_mut(bucket) {
            objects.remove(key);
        }
        Ok(())
    }

    async fn download_object(&self, bucket: &str, key: &str, destination: &Path) -> R2Result<()> {
        self.check_bucket(bucket).await?;
        let data = self
            .get(bucket, key)
            .await
            .ok_or_else(|| R2Error::transport(format!("NoSuchKey: {}/{}", bucket, key)))?;

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(destination, data).await?;
        Ok(())
    }

    async fn upload_object(&self, bucket: &str, key: &str, source: &Path) -> R2Result<()> {
        let data = tokio::fs::read(source).await?;
        self.check_bucket(bucket).await?;
        self.put(bucket, key, data).await;
        Ok(())
    }
}
