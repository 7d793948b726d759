//! Single note view with guarded load and save.

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::NotesApi;
use crate::models::{EditNoteRequest, EditedNote, NoteDetail, MAX_NOTE_CONTENT_BYTES};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDetailSnapshot {
    pub note: Option<NoteDetail>,
    pub is_loading: bool,
    pub is_saving: bool,
    pub error: Option<String>,
}

pub struct NoteDetailState {
    api: Arc<dyn NotesApi>,
    note_id: String,
    state: watch::Sender<NoteDetailSnapshot>,
}

impl std::fmt::Debug for NoteDetailState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("NoteDetailState")
            .field("note_id", &self.note_id)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl NoteDetailState {
    pub fn new(api: Arc<dyn NotesApi>, note_id: impl Into<String>) -> Self {
        Self {
            api,
            note_id: note_id.into().trim().to_string(),
            state: watch::Sender::new(NoteDetailSnapshot::default()),
        }
    }

    pub fn note_id(&self) -> &str {
        &self.note_id
    }

    pub fn subscribe(&self) -> watch::Receiver<NoteDetailSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> NoteDetailSnapshot {
        self.state.borrow().clone()
    }

    pub async fn load_if_needed(&self) {
        if self.state.borrow().note.is_some() {
            return;
        }
        self.load().await;
    }

    /// Drops the loaded note and fetches it again.
    pub async fn reload(&self) {
        self.state.send_if_modified(|state| {
            if state.is_loading {
                return false;
            }
            state.note = None;
            true
        });
        self.load().await;
    }

    pub async fn load(&self) {
        let started = self.state.send_if_modified(|state| {
            if state.is_loading {
                return false;
            }
            state.is_loading = true;
            state.error = None;
            true
        });
        if !started {
            return;
        }

        let result = self
            .api
            .fetch_full_notes(std::slice::from_ref(&self.note_id))
            .await;

        self.state.send_modify(|state| {
            match result {
                Ok(notes) => {
                    let mut notes = notes.into_iter();
                    let first = notes.next();
                    let note = if first.as_ref().is_some_and(|note| note.id == self.note_id) {
                        first
                    } else {
                        notes.find(|note| note.id == self.note_id).or(first)
                    };
                    if note.is_none() {
                        state.error = Some("Note not found.".to_string());
                    }
                    state.note = note;
                }
                Err(error) => {
                    tracing::debug!("Failed to load note {}: {}", self.note_id, error);
                    state.error = Some(error.to_string());
                }
            }
            state.is_loading = false;
        });
    }

    /// Whether `save_edits(title, content)` would send anything.
    pub fn can_save(&self, title: &str, content: &str) -> bool {
        self.state
            .borrow()
            .note
            .as_ref()
            .is_some_and(|note| edit_request(note, title, content).is_some())
    }

    /// Sends the changed fields and merges the server's answer.
    ///
    /// Returns `false` without a request when there is nothing valid to save
    /// or a save is already running. On failure the local note is untouched.
    pub async fn save_edits(&self, title: &str, content: &str) -> bool {
        let mut request = None;
        self.state.send_if_modified(|state| {
            if state.is_saving {
                return false;
            }
            request = state
                .note
                .as_ref()
                .and_then(|note| edit_request(note, title, content));
            if request.is_none() {
                return false;
            }
            state.is_saving = true;
            state.error = None;
            true
        });
        let Some(request) = request else {
            return false;
        };

        let result = self.api.edit_note(&request).await;

        let mut saved = false;
        self.state.send_modify(|state| {
            state.is_saving = false;
            match result {
                Ok(edited) => {
                    if let Some(note) = state.note.as_mut() {
                        let edited = edited.unwrap_or_else(|| submitted(note, &request));
                        note.merge_edit(edited);
                    }
                    saved = true;
                }
                Err(error) => {
                    tracing::debug!("Failed to save note {}: {}", request.note_id, error);
                    state.error = Some(error.to_string());
                }
            }
        });
        saved
    }
}

/// Edit carrying only what changed, or `None` when the draft is unchanged
/// or invalid.
fn edit_request(note: &NoteDetail, title: &str, content: &str) -> Option<EditNoteRequest> {
    let title = title.trim();
    if title.is_empty() || content.len() > MAX_NOTE_CONTENT_BYTES {
        return None;
    }

    let current_title = note.title.as_deref().unwrap_or_default().trim();
    let mut request = EditNoteRequest::new(note.id.clone());
    if title != current_title {
        request.title = Some(title.to_string());
    }
    if content != note.content {
        request.entries = Some(content.to_string());
    }
    request.has_changes().then_some(request)
}

/// What the note looks like when the server accepts without echoing it.
fn submitted(note: &NoteDetail, request: &EditNoteRequest) -> EditedNote {
    EditedNote {
        id: note.id.clone(),
        title: request.title.clone(),
        content: request.entries.clone(),
        modified_at: None,
        category_name: None,
        sub_category_names: None,
        note_type: None,
        mime_type: None,
    }
}
