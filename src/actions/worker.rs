//! Action runner - spawns one task per action and reports its outcome

use crate::client::ObjectStoreClient;
use crate::error::{R2Error, R2Result};
use crate::types::{ObjectRecord, StorageUsageReport};
use log::{info, warn};
use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::types::{ActionEvent, ActionKind, ActionStatus};

/// Handle to one spawned action.
///
/// `abort` drops the action's future: a request already on the wire is not
/// rolled back, and listeners see a `failed` event with a `cancelled` error.
#[derive(Debug)]
pub struct ActionHandle<T> {
    id: u64,
    kind: ActionKind,
    handle: JoinHandle<R2Result<T>>,
}

impl<T> ActionHandle<T> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Wait for the action's result.
    pub async fn join(self) -> R2Result<T> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                Err(R2Error::Task(format!("{} #{} cancelled", self.kind, self.id)))
            }
            Err(e) => Err(R2Error::Task(format!("{} #{} panicked: {}", self.kind, self.id, e))),
        }
    }
}

/// Runs client operations in the background for an interactive caller.
///
/// Every action publishes `started` and then exactly one of `succeeded` or
/// `failed` on the event channel returned by [`ActionRunner::new`].
#[derive(Debug, Clone)]
pub struct ActionRunner {
    client: Arc<ObjectStoreClient>,
    events: mpsc::UnboundedSender<ActionEvent>,
    next_id: Arc<AtomicU64>,
}

impl ActionRunner {
    pub fn new(client: Arc<ObjectStoreClient>) -> (Self, mpsc::UnboundedReceiver<ActionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let runner = Self {
            client,
            events,
            next_id: Arc::new(AtomicU64::new(1)),
        };
        (runner, rx)
    }

    pub fn client(&self) -> &Arc<ObjectStoreClient> {
        &self.client
    }

    pub fn list_objects(&self, bucket: &str) -> ActionHandle<Vec<ObjectRecord>> {
        let bucket = bucket.to_string();
        self.spawn(ActionKind::ListObjects, bucket.clone(), move |client| async move {
            client.list_objects(&bucket).await
        })
    }

    pub fn upload(&self, bucket: &str, key: &str, source: PathBuf) -> ActionHandle<()> {
        let (bucket, key) = (bucket.to_string(), key.to_string());
        let target = format!("{}/{}", bucket, key);
        self.spawn(ActionKind::Upload, target, move |client| async move {
            client.upload_object(&bucket, &key, &source).await
        })
    }

    pub fn download(&self, bucket: &str, key: &str, destination: PathBuf) -> ActionHandle<()> {
        let (bucket, key) = (bucket.to_string(), key.to_string());
        let target = format!("{}/{}", bucket, key);
        self.spawn(ActionKind::Download, target, move |client| async move {
            client.download_object(&bucket, &key, &destination).await
        })
    }

    pub fn delete(&self, bucket: &str, key: &str) -> ActionHandle<()> {
        let (bucket, key) = (bucket.to_string(), key.to_string());
        let target = format!("{}/{}", bucket, key);
        self.spawn(ActionKind::Delete, target, move |client| async move {
            client.delete_object(&bucket, &key).await
        })
    }

    pub fn presign_url(&self, bucket: &str, key: &str) -> ActionHandle<String> {
        let (bucket, key) = (bucket.to_string(), key.to_string());
        let target = format!("{}/{}", bucket, key);
        self.spawn(ActionKind::PresignUrl, target, move |client| async move {
            client.generate_presigned_url(&bucket, &key).await
        })
    }

    pub fn storage_usage(&self) -> ActionHandle<StorageUsageReport> {
        self.spawn(ActionKind::StorageUsage, String::new(), |client| async move {
            client.compute_storage_usage().await
        })
    }

    fn spawn<T, F, Fut>(&self, kind: ActionKind, target: String, action: F) -> ActionHandle<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<ObjectStoreClient>) -> Fut,
        Fut: Future<Output = R2Result<T>> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let events = self.events.clone();
        let future = action(self.client.clone());

        info!("action: #{} {} {} -> started", id, kind, target);
        let _ = events.send(ActionEvent {
            id,
            kind,
            target: target.clone(),
            status: ActionStatus::Started,
            error: None,
        });

        let completion = Completion {
            id,
            kind,
            target,
            events,
            sent: false,
        };
        let handle = tokio::spawn(async move {
            let result = future.await;
            match &result {
                Ok(_) => completion.finish(ActionStatus::Succeeded, None),
                Err(e) => completion.finish(ActionStatus::Failed, Some(e.to_string())),
            }
            result
        });

        ActionHandle { id, kind, handle }
    }
}

/// Terminal event of one action. Moved into the spawned task so that an
/// aborted or panicking task still reports `failed` when its future is dropped.
struct Completion {
    id: u64,
    kind: ActionKind,
    target: String,
    events: mpsc::UnboundedSender<ActionEvent>,
    sent: bool,
}

impl Completion {
    fn finish(mut self, status: ActionStatus, error: Option<String>) {
        self.send(status, error);
    }

    fn send(&mut self, status: ActionStatus, error: Option<String>) {
        if self.sent {
            return;
        }
        self.sent = true;

        match &error {
            None => info!(
                "action: #{} {} {} -> {}",
                self.id, self.kind, self.target, status
            ),
            Some(e) => warn!(
                "action: #{} {} {} -> {} error={}",
                self.id, self.kind, self.target, status, e
            ),
        }
        let _ = self.events.send(ActionEvent {
            id: self.id,
            kind: self.kind,
            target: std::mem::take(&mut self.target),
            status,
            error,
        });
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if !self.sent {
            let reason = if std::thread::panicking() {
                "panicked"
            } else {
                "cancelled"
            };
            self.send(ActionStatus::Failed, Some(reason.to_string()));
        }
    }
}
