//! Storage backends behind the object store client.
//!
//! `ObjectBackend` is the black-box capability set the client relies on:
//! list buckets, list objects, presign a GET, delete, download and upload.
//! The R2 backend talks to the real service; the memory backend keeps
//! everything in-process for tests and offline use.

pub mod memory;
pub mod s3_client;

use crate::error::R2Result;
use crate::types::{Bucket, ObjectRecord};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

pub use memory::MemoryBackend;

#[async_trait]
pub trait ObjectBackend: Send + Sync + 'static {
    /// All buckets visible to the credentials, in backend order
    async fn list_buckets(&self) -> R2Result<Vec<Bucket>>;

    /// Every object in `bucket`
    async fn list_objects(&self, bucket: &str) -> R2Result<Vec<ObjectRecord>>;

    /// Signed GET URL for one object
    async fn presign_get(&self, bucket: &str, key: &str, expires_in: Duration)
        -> R2Result<String>;

    /// Remove an object. Missing keys are not an error.
    async fn delete_object(&self, bucket: &str, key: &str) -> R2Result<()>;

    /// Write the object's bytes to `destination`
    async fn download_object(&self, bucket: &str, key: &str, destination: &Path) -> R2Result<()>;

    /// Create or overwrite an object from the file at `source`
    async fn upload_object(&self, bucket: &str, key: &str, source: &Path) -> R2Result<()>;
}
