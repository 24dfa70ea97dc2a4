//! R2 list operations (buckets, objects)

use super::types::to_utc;
use crate::error::{R2Error, R2Result};
use crate::types::{Bucket, ObjectRecord};
use aws_sdk_s3::Client;
use log::debug;

/// Keys requested per ListObjectsV2 page
const PAGE_SIZE: i32 = 1000;

/// List all buckets in the R2 account
pub async fn list_buckets(client: &Client) -> R2Result<Vec<Bucket>> {
    let response = client
        .list_buckets()
        .send()
        .await
        .map_err(|e| R2Error::from_sdk("list buckets", e))?;

    let buckets = response
        .buckets()
        .iter()
        .filter_map(|bucket| {
            let name = bucket.name()?.to_string();
            Some(Bucket {
                name,
                creation_date: bucket.creation_date().map(to_utc),
            })
        })
        .collect();

    Ok(buckets)
}

/// List every object in a bucket, following continuation tokens
pub async fn list_all_objects(client: &Client, bucket: &str) -> R2Result<Vec<ObjectRecord>> {
    let mut all_objects: Vec<ObjectRecord> = Vec::new();
    let mut continuation_token: Option<String> = None;
    let mut page_count = 0;

    loop {
        let mut request = client
            .list_objects_v2()
            .bucket(bucket)
            .max_keys(PAGE_SIZE);

        if let Some(token) = &continuation_token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| R2Error::from_sdk(&format!("list objects in {}", bucket), e))?;
        page_count += 1;

        all_objects.extend(response.contents().iter().filter_map(|obj| {
            let key = obj.key()?.to_string();
            Some(ObjectRecord {
                key,
                size: obj.size().unwrap_or(0).max(0) as u64,
                last_modified: obj.last_modified().map(to_utc).unwrap_or_default(),
                etag: obj.e_tag().map(|s| s.to_string()),
            })
        }));

        let next_token = response.next_continuation_token().map(|s| s.to_string());
        if !response.is_truncated().unwrap_or(false) || next_token.is_none() {
            break;
        }
        continuation_token = next_token;
    }

    debug!(
        "list_objects: bucket={} pages={} objects={}",
        bucket,
        page_count,
        all_objects.len()
    );
    Ok(all_objects)
}
