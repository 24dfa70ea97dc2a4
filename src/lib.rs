//! R2 explorer core.
//!
//! - [`ObjectStoreClient`]: bucket/object listing, presigned URLs, delete,
//!   upload, download and per-bucket usage over any [`ObjectBackend`]
//! - [`KeyTree`]: turns flat `/`-delimited keys into a display hierarchy
//! - [`ActionRunner`]: runs client operations as tasks with status events

pub mod actions;
pub mod client;
pub mod config;
pub mod error;
pub mod providers;
pub mod r2;
pub mod tree;
pub mod types;

pub use actions::{ActionEvent, ActionHandle, ActionKind, ActionRunner, ActionStatus};
pub use client::{ObjectStoreClient, PRESIGNED_URL_TTL};
pub use config::R2Config;
pub use error::{R2Error, R2Result};
pub use providers::{MemoryBackend, ObjectBackend};
pub use r2::R2Backend;
pub use tree::{format_size, format_timestamp, KeyTree, KeyTreeNode, TreeEntry};
pub use types::{Bucket, ObjectRecord, StorageUsageReport};
