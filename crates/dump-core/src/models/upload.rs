//! Capture uploads: signed-URL handshake payloads and session items.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest payload accepted for a single upload (100 MiB).
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// What kind of capture produced an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Photo,
    Audio,
    File,
    Text,
}

impl UploadKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Audio => "audio",
            Self::File => "file",
            Self::Text => "text",
        }
    }

    /// Prefix of generated file names.
    pub const fn filename_prefix(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Audio => "voice",
            Self::File => "file",
            Self::Text => "note",
        }
    }

    pub const fn default_extension(self) -> &'static str {
        match self {
            Self::Photo => "jpg",
            Self::Audio => "m4a",
            Self::File => "bin",
            Self::Text => "txt",
        }
    }

    pub const fn default_content_type(self) -> &'static str {
        match self {
            Self::Photo => "image/jpeg",
            Self::Audio => "audio/m4a",
            Self::File => "application/octet-stream",
            Self::Text => "text/plain",
        }
    }

    /// Text captures are processed by the backend as quick notes.
    pub const fn is_quick_note(self) -> bool {
        matches!(self, Self::Text)
    }

    /// `<prefix>_<uuid>.<ext>`; a blank extension falls back to the default.
    pub fn generate_filename(self, extension: Option<&str>) -> String {
        let extension = extension
            .map(|ext| ext.trim().trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| self.default_extension())
            .to_ascii_lowercase();
        format!("{}_{}.{extension}", self.filename_prefix(), Uuid::new_v4())
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Lifecycle of one upload. Only `Failed` can be retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Uploading,
    Success { storage_path: String },
    Failed { reason: String },
}

impl UploadStatus {
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Failed { .. })
    }

    pub fn display_text(&self) -> String {
        match self {
            Self::Pending => "Pending…".to_string(),
            Self::Uploading => "Uploading…".to_string(),
            Self::Success { storage_path } => format!("Uploaded to {storage_path}"),
            Self::Failed { reason } => format!("Failed: {reason}"),
        }
    }
}

/// One capture in the current upload session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSessionItem {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub kind: UploadKind,
    pub filename: String,
    pub local_ref: Option<PathBuf>,
    pub status: UploadStatus,
    pub thumbnail: Option<Vec<u8>>,
}

impl UploadSessionItem {
    pub fn new(kind: UploadKind, filename: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            kind,
            filename: filename.into(),
            local_ref: None,
            status: UploadStatus::Pending,
            thumbnail: None,
        }
    }
}

/// Body of `POST /api/mobile/upload_file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub filename: String,
    pub content_type: String,
    pub is_quick_note: bool,
}

impl UploadRequest {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            is_quick_note: false,
        }
    }

    #[must_use]
    pub const fn quick_note(mut self, is_quick_note: bool) -> Self {
        self.is_quick_note = is_quick_note;
        self
    }
}

/// Signed upload URL handed out by the backend.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicket {
    pub upload_url: String,
    pub storage_path: String,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub metadata: Option<UploadMetadata>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub is_quick_note: bool,
}

impl fmt::Debug for UploadTicket {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("UploadTicket")
            .field("upload_url", &"[REDACTED]")
            .field("storage_path", &self.storage_path)
            .field("original_filename", &self.original_filename)
            .field("uuid", &self.uuid)
            .field("is_quick_note", &self.is_quick_note)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadMetadata {
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub upload_time: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub file_extension: Option<String>,
    #[serde(default)]
    pub file_uuid: Option<String>,
    /// Sent by the backend as the string `"true"` / `"false"`.
    #[serde(default)]
    pub is_quick_note: Option<String>,
}
