//! Typed client for The Dump REST API.
//!
//! [`DumpClient`] owns one [`HttpTransport`] and exposes one method per
//! backend operation through the [`NotesApi`], [`MediaApi`] and [`UsageApi`]
//! traits. State containers depend on the traits so tests can swap in fakes.
//! Every method validates its input first and fails with
//! [`ApiError::BadRequest`](crate::error::ApiError::BadRequest) without
//! touching the network when validation fails.

mod media;
mod notes;
mod transport;
mod usage;

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::TokenProvider;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::models::{
    CategoriesUpdateResponse, Category, EditNoteRequest, EditedNote, NoteCounts, NoteDetail,
    NotePage, NoteQuery, SubCategoryRequest, SubscriptionStatus, UploadRequest, UploadTicket,
    VerifyPurchaseResponse,
};

pub use transport::HttpTransport;

pub(crate) const NOTE_COUNTS_PATH: &str = "/api/note_counts";
pub(crate) const PULL_NOTES_PATH: &str = "/api/pull_notes";
pub(crate) const PULL_FULL_NOTES_PATH: &str = "/api/pull_full_notes";
pub(crate) const EDIT_NOTE_PATH: &str = "/api/edit_note";
pub(crate) const UPDATE_CATEGORIES_PATH: &str = "/api/categories/update";
pub(crate) const SUB_CATEGORIES_PATH: &str = "/api/subcategories";
pub(crate) const UPLOAD_FILE_PATH: &str = "/api/mobile/upload_file";
pub(crate) const USAGE_STATUS_PATH: &str = "/api/usage-status";
pub(crate) const VERIFY_PURCHASE_PATH: &str = "/api/verify-ios-purchase";

/// Note browsing, editing, and category management.
#[async_trait]
pub trait NotesApi: Send + Sync {
    async fn fetch_counts(&self) -> Result<NoteCounts>;

    async fn fetch_notes(&self, query: &NoteQuery) -> Result<NotePage>;

    async fn fetch_full_notes(&self, note_ids: &[String]) -> Result<Vec<NoteDetail>>;

    /// Applies a partial update. `Ok(None)` means the server accepted the
    /// edit without echoing the note back.
    async fn edit_note(&self, request: &EditNoteRequest) -> Result<Option<EditedNote>>;

    async fn update_categories(&self, categories: &[Category])
        -> Result<CategoriesUpdateResponse>;

    async fn create_sub_category(&self, request: &SubCategoryRequest) -> Result<()>;
}

/// Two-step capture upload: signed URL, then blob `PUT`.
#[async_trait]
pub trait MediaApi: Send + Sync {
    async fn upload(&self, request: &UploadRequest, bytes: Vec<u8>) -> Result<UploadTicket>;
}

/// Usage snapshot and purchase verification.
#[async_trait]
pub trait UsageApi: Send + Sync {
    async fn fetch_usage_status(&self) -> Result<SubscriptionStatus>;

    async fn verify_purchase(&self, signed_transaction: &str) -> Result<VerifyPurchaseResponse>;
}

/// Concrete API client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DumpClient {
    transport: HttpTransport,
}

impl DumpClient {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(config, tokens)?,
        })
    }

    pub const fn from_transport(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub(crate) const fn transport(&self) -> &HttpTransport {
        &self.transport
    }
}
