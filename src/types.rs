//! Records exchanged between the client and its callers

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bucket {
    pub name: String,
    pub creation_date: Option<DateTime<Utc>>,
}

/// Snapshot of one object as returned by a listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectRecord {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub etag: Option<String>,
}

impl ObjectRecord {
    pub fn new(key: impl Into<String>, size: u64, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified,
            etag: None,
        }
    }
}

/// Aggregate byte size per bucket, in the order the buckets were listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageUsageReport {
    buckets: Vec<(String, u64)>,
}

impl StorageUsageReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a bucket's size. A bucket seen before keeps its position.
    pub fn insert(&mut self, bucket: impl Into<String>, bytes: u64) {
        let bucket = bucket.into();
        match self.buckets.iter_mut().find(|(name, _)| *name == bucket) {
            Some(entry) => entry.1 = bytes,
            None => self.buckets.push((bucket, bytes)),
        }
    }

    pub fn get(&self, bucket: &str) -> Option<u64> {
        self.buckets
            .iter()
            .find(|(name, _)| name == bucket)
            .map(|(_, size)| *size)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.buckets.iter().map(|(name, size)| (name.as_str(), *size))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.buckets.iter().map(|(_, size)| size).sum()
    }

    /// Total in MB, each bucket rounded to two decimals before summing.
    pub fn total_megabytes(&self) -> f64 {
        self.buckets
            .iter()
            .map(|&(_, bytes)| round2(bytes as f64 / 1024.0 / 1024.0))
            .sum()
    }
}

impl FromIterator<(String, u64)> for StorageUsageReport {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut report = Self::new();
        for (bucket, bytes) in iter {
            report.insert(bucket, bytes);
        }
        report
    }
}

// Serialized as a JSON object keyed by bucket name
impl Serialize for StorageUsageReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (name, size) in &self.buckets {
            map.serialize_entry(name, size)?;
        }
        map.end()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
