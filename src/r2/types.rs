//! R2 client creation and SDK value conversions

use crate::config::R2Config;
use crate::error::R2Result;
use crate::providers::s3_client::{create_s3_client, S3ClientConfig};
use aws_sdk_s3::primitives::DateTime as SdkDateTime;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};

/// Create an S3 client configured for Cloudflare R2
pub fn create_r2_client(config: &R2Config) -> R2Result<Client> {
    config.validate()?;
    let endpoint_url = config.endpoint()?;

    Ok(create_s3_client(&S3ClientConfig {
        access_key_id: &config.access_key_id,
        secret_access_key: &config.secret_access_key,
        region: &config.region,
        endpoint_url: &endpoint_url,
        force_path_style: true,
    }))
}

pub(crate) fn to_utc(timestamp: &SdkDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos()).unwrap_or_default()
}
