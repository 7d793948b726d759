//! Note models as exchanged with the backend.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Maximum note body size accepted for edits (UTF-8 bytes).
pub const MAX_NOTE_CONTENT_BYTES: usize = 500 * 1024;

/// Maximum sub-categories attached to a single note.
pub const MAX_SUB_CATEGORIES_PER_NOTE: usize = 3;

/// Lightweight note row used by list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePreview {
    #[serde(rename = "organized_note_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "preview", default)]
    pub preview_text: String,
    #[serde(rename = "note_content_modified")]
    pub modified_at: String,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub note_type: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(rename = "sub_cat_names", default)]
    pub sub_category_names: Option<Vec<String>>,
}

impl NotePreview {
    /// Title when present, otherwise the first non-blank preview line.
    pub fn display_title(&self) -> String {
        display_title(self.title.as_deref(), &self.preview_text)
    }

    pub fn modified_at_parsed(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.modified_at)
    }
}

/// Full note body, loaded per id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDetail {
    #[serde(rename = "organized_note_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "note_content")]
    pub content: String,
    #[serde(rename = "note_content_modified")]
    pub modified_at: String,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(rename = "sub_cat_names", default)]
    pub sub_category_names: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub note_type: Option<String>,
}

impl NoteDetail {
    pub fn display_title(&self) -> String {
        display_title(self.title.as_deref(), &self.content)
    }

    pub fn modified_at_parsed(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.modified_at)
    }

    /// Overlays the fields the server returned after an edit.
    ///
    /// Fields the server omitted, or returned blank or empty, keep their
    /// current value. The id never changes.
    pub fn merge_edit(&mut self, edited: EditedNote) {
        if edited.id != self.id {
            tracing::warn!(
                "Edit response carried id {} for note {}; keeping local id",
                edited.id,
                self.id
            );
        }

        if let Some(title) = non_blank(edited.title) {
            self.title = Some(title);
        }
        if let Some(content) = non_blank(edited.content) {
            self.content = content;
        }
        if let Some(modified_at) = non_blank(edited.modified_at) {
            self.modified_at = modified_at;
        }
        if let Some(category_name) = non_blank(edited.category_name) {
            self.category_name = Some(category_name);
        }
        if let Some(sub_category_names) = edited
            .sub_category_names
            .filter(|names| !names.is_empty())
        {
            self.sub_category_names = Some(sub_category_names);
        }
        if let Some(note_type) = non_blank(edited.note_type) {
            self.note_type = Some(note_type);
        }
        if let Some(mime_type) = non_blank(edited.mime_type) {
            self.mime_type = Some(mime_type);
        }
    }
}

/// `GET /api/note_counts` facet buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteCounts {
    #[serde(default)]
    pub categories: BTreeMap<String, u64>,
    #[serde(default)]
    pub sub_categories: BTreeMap<String, u64>,
    #[serde(default)]
    pub note_types: BTreeMap<String, u64>,
    #[serde(default)]
    pub mime_types: BTreeMap<String, u64>,
    #[serde(default)]
    pub date_groups: BTreeMap<String, u64>,
}

/// Opaque pagination position echoed back on the next request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub time: Option<String>,
    pub id: Option<String>,
}

impl PageCursor {
    /// Builds a cursor unless both halves are absent (end of list).
    pub fn from_parts(time: Option<String>, id: Option<String>) -> Option<Self> {
        if time.is_none() && id.is_none() {
            None
        } else {
            Some(Self { time, id })
        }
    }
}

/// Wire shape of `GET /api/pull_notes`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NoteListResponse {
    #[serde(default)]
    pub notes: Vec<NotePreview>,
    #[serde(default)]
    pub next_cursor_time: Option<String>,
    #[serde(default)]
    pub next_cursor_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// One page of notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePage {
    pub notes: Vec<NotePreview>,
    pub cursor: Option<PageCursor>,
    pub has_more: bool,
}

impl NoteListResponse {
    /// `has_more` is the server flag, forced off when no cursor came back.
    pub(crate) fn into_page(self) -> NotePage {
        let cursor = PageCursor::from_parts(self.next_cursor_time, self.next_cursor_id);
        let has_more = self.has_more && cursor.is_some();
        NotePage {
            notes: self.notes,
            cursor,
            has_more,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NoteDetailResponse {
    #[serde(default)]
    pub notes: Vec<NoteDetail>,
}

/// Partial update body for `POST /api/edit_note`. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditNoteRequest {
    pub note_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_categories: Option<Vec<String>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub note_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl EditNoteRequest {
    pub fn new(note_id: impl Into<String>) -> Self {
        Self {
            note_id: note_id.into(),
            ..Default::default()
        }
    }

    /// Whether at least one field besides the id is set.
    pub const fn has_changes(&self) -> bool {
        self.entries.is_some()
            || self.title.is_some()
            || self.category.is_some()
            || self.sub_categories.is_some()
            || self.note_type.is_some()
            || self.tags.is_some()
    }
}

/// Note fields echoed back by `POST /api/edit_note`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EditedNote {
    #[serde(rename = "organized_note_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "note_content", default)]
    pub content: Option<String>,
    #[serde(rename = "note_content_modified", default)]
    pub modified_at: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(rename = "sub_cat_names", default)]
    pub sub_category_names: Option<Vec<String>>,
    #[serde(default)]
    pub note_type: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EditNoteResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub note: Option<EditedNote>,
    #[serde(default)]
    pub error: Option<String>,
}

fn display_title(title: Option<&str>, body: &str) -> String {
    if let Some(title) = title.map(str::trim).filter(|title| !title.is_empty()) {
        return title.to_string();
    }
    body.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("Note")
        .to_string()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim()).ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
