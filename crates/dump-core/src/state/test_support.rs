//! Scripted in-memory backends for state container tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::api::{MediaApi, NotesApi, UsageApi};
use crate::error::{ApiError, Result};
use crate::models::{
    CategoriesUpdateResponse, Category, EditNoteRequest, EditedNote, NoteCounts, NoteDetail,
    NotePage, NotePreview, NoteQuery, PageCursor, SubCategoryRequest, SubscriptionStatus,
    SubscriptionTier, UploadRequest, UploadTicket, VerifyPurchaseResponse,
};

/// Holds each request until a permit is released when a gate is set.
#[derive(Debug, Default)]
pub struct Gate(Option<Arc<Semaphore>>);

impl Gate {
    pub fn closed() -> (Self, Arc<Semaphore>) {
        let semaphore = Arc::new(Semaphore::new(0));
        (Self(Some(Arc::clone(&semaphore))), semaphore)
    }

    async fn pass(&self) {
        if let Some(semaphore) = &self.0 {
            semaphore.acquire().await.unwrap().forget();
        }
    }
}

fn next<T>(queue: &Mutex<VecDeque<Result<T>>>, fallback: impl FnOnce() -> T) -> Result<T> {
    queue.lock().unwrap().pop_front().unwrap_or_else(|| Ok(fallback()))
}

#[derive(Debug, Default)]
pub struct FakeNotesApi {
    pub gate: Gate,
    pub pages: Mutex<VecDeque<Result<NotePage>>>,
    pub queries: Mutex<Vec<NoteQuery>>,
    pub counts: Mutex<VecDeque<Result<NoteCounts>>>,
    pub counts_calls: AtomicUsize,
    pub details: Mutex<VecDeque<Result<Vec<NoteDetail>>>>,
    pub detail_requests: Mutex<Vec<Vec<String>>>,
    pub edits: Mutex<VecDeque<Result<Option<EditedNote>>>>,
    pub edit_requests: Mutex<Vec<EditNoteRequest>>,
    pub category_results: Mutex<VecDeque<Result<CategoriesUpdateResponse>>>,
    pub category_updates: Mutex<Vec<Vec<Category>>>,
    pub sub_category_requests: Mutex<Vec<SubCategoryRequest>>,
}

impl FakeNotesApi {
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let (gate, semaphore) = Gate::closed();
        (
            Self {
                gate,
                ..Default::default()
            },
            semaphore,
        )
    }

    pub fn push_page(&self, page: Result<NotePage>) {
        self.pages.lock().unwrap().push_back(page);
    }

    pub fn push_counts(&self, counts: Result<NoteCounts>) {
        self.counts.lock().unwrap().push_back(counts);
    }

    pub fn push_details(&self, details: Result<Vec<NoteDetail>>) {
        self.details.lock().unwrap().push_back(details);
    }

    pub fn push_edit(&self, edit: Result<Option<EditedNote>>) {
        self.edits.lock().unwrap().push_back(edit);
    }

    pub fn push_category_result(&self, result: Result<CategoriesUpdateResponse>) {
        self.category_results.lock().unwrap().push_back(result);
    }

    pub fn queries(&self) -> Vec<NoteQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn edit_requests(&self) -> Vec<EditNoteRequest> {
        self.edit_requests.lock().unwrap().clone()
    }

    pub fn category_updates(&self) -> Vec<Vec<Category>> {
        self.category_updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotesApi for FakeNotesApi {
    async fn fetch_counts(&self) -> Result<NoteCounts> {
        self.counts_calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        next(&self.counts, NoteCounts::default)
    }

    async fn fetch_notes(&self, query: &NoteQuery) -> Result<NotePage> {
        self.queries.lock().unwrap().push(query.clone());
        self.gate.pass().await;
        next(&self.pages, NotePage::default)
    }

    async fn fetch_full_notes(&self, note_ids: &[String]) -> Result<Vec<NoteDetail>> {
        self.detail_requests.lock().unwrap().push(note_ids.to_vec());
        self.gate.pass().await;
        next(&self.details, Vec::new)
    }

    async fn edit_note(&self, request: &EditNoteRequest) -> Result<Option<EditedNote>> {
        self.edit_requests.lock().unwrap().push(request.clone());
        self.gate.pass().await;
        next(&self.edits, || None)
    }

    async fn update_categories(
        &self,
        categories: &[Category],
    ) -> Result<CategoriesUpdateResponse> {
        self.category_updates
            .lock()
            .unwrap()
            .push(categories.to_vec());
        self.gate.pass().await;
        next(&self.category_results, CategoriesUpdateResponse::default)
    }

    async fn create_sub_category(&self, request: &SubCategoryRequest) -> Result<()> {
        self.sub_category_requests
            .lock()
            .unwrap()
            .push(request.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeUsageApi {
    pub gate: Gate,
    pub statuses: Mutex<VecDeque<Result<SubscriptionStatus>>>,
    pub status_calls: AtomicUsize,
    pub verifications: Mutex<VecDeque<Result<VerifyPurchaseResponse>>>,
    pub verified: Mutex<Vec<String>>,
}

impl FakeUsageApi {
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let (gate, semaphore) = Gate::closed();
        (
            Self {
                gate,
                ..Default::default()
            },
            semaphore,
        )
    }

    pub fn push_status(&self, status: Result<SubscriptionStatus>) {
        self.statuses.lock().unwrap().push_back(status);
    }

    pub fn push_verification(&self, result: Result<VerifyPurchaseResponse>) {
        self.verifications.lock().unwrap().push_back(result);
    }

    pub fn verified(&self) -> Vec<String> {
        self.verified.lock().unwrap().clone()
    }
}

#[async_trait]
impl UsageApi for FakeUsageApi {
    async fn fetch_usage_status(&self) -> Result<SubscriptionStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        next(&self.statuses, || status(SubscriptionTier::Free))
    }

    async fn verify_purchase(&self, signed_transaction: &str) -> Result<VerifyPurchaseResponse> {
        self.verified
            .lock()
            .unwrap()
            .push(signed_transaction.to_string());
        next(&self.verifications, || VerifyPurchaseResponse {
            success: true,
            subscription_tier: SubscriptionTier::Paid,
        })
    }
}

#[derive(Debug, Default)]
pub struct FakeMediaApi {
    pub gate: Gate,
    pub results: Mutex<VecDeque<Result<UploadTicket>>>,
    pub requests: Mutex<Vec<(UploadRequest, usize)>>,
}

impl FakeMediaApi {
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let (gate, semaphore) = Gate::closed();
        (
            Self {
                gate,
                ..Default::default()
            },
            semaphore,
        )
    }

    pub fn push_result(&self, result: Result<UploadTicket>) {
        self.results.lock().unwrap().push_back(result);
    }

    pub fn requests(&self) -> Vec<(UploadRequest, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaApi for FakeMediaApi {
    async fn upload(&self, request: &UploadRequest, bytes: Vec<u8>) -> Result<UploadTicket> {
        self.requests
            .lock()
            .unwrap()
            .push((request.clone(), bytes.len()));
        self.gate.pass().await;
        let filename = request.filename.clone();
        next(&self.results, || ticket(&format!("uploads/{filename}")))
    }
}

pub fn preview(id: &str) -> NotePreview {
    NotePreview {
        id: id.to_string(),
        title: Some(format!("Note {id}")),
        preview_text: String::new(),
        modified_at: "2026-10-01T12:00:00Z".to_string(),
        category_name: None,
        note_type: None,
        mime_type: None,
        sub_category_names: None,
    }
}

pub fn preview_with_sub_categories(id: &str, names: &[&str]) -> NotePreview {
    NotePreview {
        sub_category_names: Some(names.iter().map(ToString::to_string).collect()),
        ..preview(id)
    }
}

pub fn page(notes: Vec<NotePreview>, cursor: Option<(&str, &str)>, has_more: bool) -> NotePage {
    NotePage {
        notes,
        cursor: cursor.map(|(time, id)| PageCursor {
            time: Some(time.to_string()),
            id: Some(id.to_string()),
        }),
        has_more,
    }
}

pub fn previews(prefix: &str, count: usize) -> Vec<NotePreview> {
    (0..count).map(|index| preview(&format!("{prefix}{index}"))).collect()
}

pub fn detail(id: &str, title: &str, content: &str) -> NoteDetail {
    NoteDetail {
        id: id.to_string(),
        title: Some(title.to_string()),
        content: content.to_string(),
        modified_at: "2026-10-01T12:00:00Z".to_string(),
        category_name: Some("Home".to_string()),
        sub_category_names: None,
        tags: None,
        mime_type: None,
        note_type: None,
    }
}

pub fn status(tier: SubscriptionTier) -> SubscriptionStatus {
    SubscriptionStatus {
        tier,
        tokens_used: 100,
        token_limit: 1000,
        tokens_remaining: 900,
        usage_pct: 10.0,
        is_blocked: false,
        trial_ends_at: None,
        resets_at: "2026-11-01T00:00:00Z".to_string(),
    }
}

pub fn ticket(storage_path: &str) -> UploadTicket {
    UploadTicket {
        upload_url: "https://storage.example.com/signed".to_string(),
        storage_path: storage_path.to_string(),
        original_filename: None,
        metadata: None,
        uuid: None,
        is_quick_note: false,
    }
}

pub fn server_error(message: &str) -> ApiError {
    ApiError::ServerError(message.to_string())
}
