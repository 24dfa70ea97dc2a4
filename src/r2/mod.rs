//! R2 module - Cloudflare R2 storage operations
//!
//! This module is organized into submodules:
//! - `types`: Client creation and SDK conversions
//! - `list`: List operations (buckets, objects)
//! - `objects`: Object operations (delete)
//! - `download` / `upload`: Single-request transfers to and from local files
//! - `presigned`: Presigned URL generation
//!
//! `R2Backend` ties them together behind [`ObjectBackend`].

mod download;
mod list;
mod objects;
mod presigned;
mod types;
mod upload;

pub use types::create_r2_client;

use crate::config::R2Config;
use crate::error::R2Result;
use crate::providers::ObjectBackend;
use crate::types::{Bucket, ObjectRecord};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use std::path::Path;
use std::time::Duration;

/// Backend talking to R2 (or any S3-compatible endpoint) through the AWS SDK.
#[derive(Debug, Clone)]
pub struct R2Backend {
    client: Client,
}

impl R2Backend {
    pub fn new(config: &R2Config) -> R2Result<Self> {
        Ok(Self {
            client: create_r2_client(config)?,
        })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectBackend for R2Backend {
    async fn list_buckets(&self) -> R2Result<Vec<Bucket>> {
        list::list_buckets(&self.client).await
    }

    async fn list_objects(&self, bucket: &str) -> R2Result<Vec<ObjectRecord>> {
        list::list_all_objects(&self.client, bucket).await
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> R2Result<String> {
        presigned::generate_presigned_url(&self.client, bucket, key, expires_in).await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> R2Result<()> {
        objects::delete_object(&self.client, bucket, key).await
    }

    async fn download_object(&self, bucket: &str, key: &str, destination: &Path) -> R2Result<()> {
        download::download_file(&self.client, bucket, key, destination).await
    }

    async fn upload_object(&self, bucket: &str, key: &str, source: &Path) -> R2Result<()> {
        upload::upload_file(&self.client, bucket, key, source).await
    }
}
