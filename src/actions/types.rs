//! Action event types and payloads

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ListObjects,
    Upload,
    Download,
    Delete,
    PresignUrl,
    StorageUsage,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::ListObjects => write!(f, "list_objects"),
            ActionKind::Upload => write!(f, "upload"),
            ActionKind::Download => write!(f, "download"),
            ActionKind::Delete => write!(f, "delete"),
            ActionKind::PresignUrl => write!(f, "presign_url"),
            ActionKind::StorageUsage => write!(f, "storage_usage"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Started,
    Succeeded,
    Failed,
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionStatus::Started => write!(f, "started"),
            ActionStatus::Succeeded => write!(f, "succeeded"),
            ActionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Status change payload published for every action
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActionEvent {
    pub id: u64,
    pub kind: ActionKind,
    /// `bucket` or `bucket/key` the action works on
    pub target: String,
    pub status: ActionStatus,
    pub error: Option<String>,
}
