//! Session-scoped list of captures, each uploaded by its own task.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::MediaApi;
use crate::models::{UploadKind, UploadRequest, UploadSessionItem, UploadStatus};

/// Bytes captured by the user plus how they should be named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCapture {
    pub kind: UploadKind,
    pub bytes: Vec<u8>,
    pub extension: Option<String>,
    pub content_type: Option<String>,
    pub local_ref: Option<PathBuf>,
    pub thumbnail: Option<Vec<u8>>,
}

impl UploadCapture {
    pub fn new(kind: UploadKind, bytes: Vec<u8>) -> Self {
        Self {
            kind,
            bytes,
            extension: None,
            content_type: None,
            local_ref: None,
            thumbnail: None,
        }
    }

    /// Quick note typed into the capture box.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(UploadKind::Text, text.into().into_bytes())
    }

    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn local_ref(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_ref = Some(path.into());
        self
    }

    #[must_use]
    pub fn thumbnail(mut self, thumbnail: Vec<u8>) -> Self {
        self.thumbnail = Some(thumbnail);
        self
    }
}

/// What is needed to send an item again.
#[derive(Debug, Clone)]
struct Payload {
    request: UploadRequest,
    bytes: Vec<u8>,
}

pub struct UploadSession {
    api: Arc<dyn MediaApi>,
    items: watch::Sender<Vec<UploadSessionItem>>,
    payloads: Mutex<HashMap<Uuid, Payload>>,
}

impl std::fmt::Debug for UploadSession {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("UploadSession")
            .field("items", &*self.items.borrow())
            .finish_non_exhaustive()
    }
}

impl UploadSession {
    pub fn new(api: Arc<dyn MediaApi>) -> Self {
        Self {
            api,
            items: watch::Sender::new(Vec::new()),
            payloads: Mutex::new(HashMap::new()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<UploadSessionItem>> {
        self.items.subscribe()
    }

    /// Items in capture order.
    pub fn items(&self) -> Vec<UploadSessionItem> {
        self.items.borrow().clone()
    }

    pub fn item(&self, id: Uuid) -> Option<UploadSessionItem> {
        self.items.borrow().iter().find(|item| item.id == id).cloned()
    }

    /// Appends the capture and starts uploading it in the background.
    ///
    /// The handle resolves to the item's final status. Dropping it does not
    /// cancel the upload.
    pub fn capture(self: &Arc<Self>, capture: UploadCapture) -> (Uuid, JoinHandle<UploadStatus>) {
        let UploadCapture {
            kind,
            bytes,
            extension,
            content_type,
            local_ref,
            thumbnail,
        } = capture;

        let filename = kind.generate_filename(extension.as_deref());
        let content_type = content_type
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| kind.default_content_type().to_string());
        let request = UploadRequest::new(filename.clone(), content_type).quick_note(kind.is_quick_note());

        let mut item = UploadSessionItem::new(kind, filename);
        item.local_ref = local_ref;
        item.thumbnail = thumbnail;
        let id = item.id;

        tracing::debug!("Captured {} as {}", kind, item.filename);
        self.remember(id, Payload { request, bytes });
        self.items.send_modify(|items| items.push(item));

        (id, self.spawn_upload(id))
    }

    /// Sends a failed item again. Any other state is left alone.
    pub fn retry(self: &Arc<Self>, id: Uuid) -> Option<JoinHandle<UploadStatus>> {
        let claimed = self.items.send_if_modified(|items| {
            match items.iter_mut().find(|item| item.id == id) {
                Some(item) if item.status.is_retryable() => {
                    item.status = UploadStatus::Pending;
                    true
                }
                _ => false,
            }
        });
        if !claimed {
            return None;
        }
        tracing::debug!("Retrying upload {}", id);
        Some(self.spawn_upload(id))
    }

    fn spawn_upload(self: &Arc<Self>, id: Uuid) -> JoinHandle<UploadStatus> {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.upload(id).await })
    }

    async fn upload(&self, id: Uuid) -> UploadStatus {
        let status = match self.payload(id) {
            Some(payload) => {
                self.set_status(id, UploadStatus::Uploading);
                match self.api.upload(&payload.request, payload.bytes).await {
                    Ok(ticket) => {
                        tracing::info!("Uploaded {} to {}", payload.request.filename, ticket.storage_path);
                        self.forget(id);
                        UploadStatus::Success {
                            storage_path: ticket.storage_path,
                        }
                    }
                    Err(error) => {
                        tracing::warn!("Upload of {} failed: {}", payload.request.filename, error);
                        UploadStatus::Failed {
                            reason: error.to_string(),
                        }
                    }
                }
            }
            None => UploadStatus::Failed {
                reason: "Upload data is no longer available".to_string(),
            },
        };
        self.set_status(id, status.clone());
        status
    }

    fn set_status(&self, id: Uuid, status: UploadStatus) {
        self.items.send_if_modified(|items| {
            items
                .iter_mut()
                .find(|item| item.id == id)
                .map(|item| item.status = status)
                .is_some()
        });
    }

    fn remember(&self, id: Uuid, payload: Payload) {
        if let Ok(mut payloads) = self.payloads.lock() {
            payloads.insert(id, payload);
        }
    }

    fn payload(&self, id: Uuid) -> Option<Payload> {
        self.payloads
            .lock()
            .ok()
            .and_then(|payloads| payloads.get(&id).cloned())
    }

    fn forget(&self, id: Uuid) {
        if let Ok(mut payloads) = self.payloads.lock() {
            payloads.remove(&id);
        }
    }
}
