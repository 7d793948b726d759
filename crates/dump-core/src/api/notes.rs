use std::collections::HashSet;

use async_trait::async_trait;
use serde::Serialize;

use super::{
    DumpClient, NotesApi, EDIT_NOTE_PATH, NOTE_COUNTS_PATH, PULL_FULL_NOTES_PATH,
    PULL_NOTES_PATH, SUB_CATEGORIES_PATH, UPDATE_CATEGORIES_PATH,
};
use crate::error::{ApiError, Result};
use crate::models::{
    CategoriesUpdateRequest, CategoriesUpdateResponse, Category, EditNoteRequest,
    EditNoteResponse, EditedNote, NoteCounts, NoteDetail, NoteDetailResponse, NoteListResponse,
    NotePage, NoteQuery, SubCategoryRequest, MAX_NOTE_CONTENT_BYTES, MAX_SUB_CATEGORIES_PER_NOTE,
};

#[derive(Serialize)]
struct FullNotesRequest<'a> {
    note_ids: &'a [String],
}

#[async_trait]
impl NotesApi for DumpClient {
    async fn fetch_counts(&self) -> Result<NoteCounts> {
        self.transport().get(NOTE_COUNTS_PATH, &[]).await
    }

    async fn fetch_notes(&self, query: &NoteQuery) -> Result<NotePage> {
        let response: NoteListResponse = self
            .transport()
            .get(PULL_NOTES_PATH, &query.to_pairs())
            .await?;
        Ok(response.into_page())
    }

    async fn fetch_full_notes(&self, note_ids: &[String]) -> Result<Vec<NoteDetail>> {
        let note_ids = validate_note_ids(note_ids)?;
        let response: NoteDetailResponse = self
            .transport()
            .post(PULL_FULL_NOTES_PATH, &FullNotesRequest { note_ids: &note_ids })
            .await?;
        Ok(response.notes)
    }

    async fn edit_note(&self, request: &EditNoteRequest) -> Result<Option<EditedNote>> {
        validate_edit(request)?;
        let response: EditNoteResponse = self.transport().post(EDIT_NOTE_PATH, request).await?;
        if response.success == Some(false) {
            return Err(ApiError::BadRequest(
                response
                    .error
                    .unwrap_or_else(|| "Edit was rejected".to_string()),
            ));
        }
        Ok(response.note)
    }

    async fn update_categories(
        &self,
        categories: &[Category],
    ) -> Result<CategoriesUpdateResponse> {
        let categories = validate_categories(categories)?;
        let response: CategoriesUpdateResponse = self
            .transport()
            .post(
                UPDATE_CATEGORIES_PATH,
                &CategoriesUpdateRequest {
                    categories: &categories,
                },
            )
            .await?;
        tracing::debug!(
            "Categories updated: {} saved",
            response.updated_count.unwrap_or(0)
        );
        Ok(response)
    }

    async fn create_sub_category(&self, request: &SubCategoryRequest) -> Result<()> {
        validate_sub_category(request)?;
        self.transport()
            .post_unit(SUB_CATEGORIES_PATH, request)
            .await
    }
}

/// Trimmed, non-empty ids; at least one is required.
pub(crate) fn validate_note_ids(note_ids: &[String]) -> Result<Vec<String>> {
    let ids: Vec<String> = note_ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect();
    if ids.is_empty() {
        return Err(ApiError::bad_request("At least one note id is required"));
    }
    Ok(ids)
}

pub(crate) fn validate_edit(request: &EditNoteRequest) -> Result<()> {
    if request.note_id.trim().is_empty() {
        return Err(ApiError::bad_request("Note id is required"));
    }
    if !request.has_changes() {
        return Err(ApiError::bad_request("Nothing to update"));
    }
    if let Some(title) = &request.title {
        if title.trim().is_empty() {
            return Err(ApiError::bad_request("Title cannot be empty"));
        }
    }
    if let Some(entries) = &request.entries {
        if entries.len() > MAX_NOTE_CONTENT_BYTES {
            return Err(ApiError::bad_request("Note content exceeds 500KB limit"));
        }
    }
    if let Some(sub_categories) = &request.sub_categories {
        if sub_categories.len() > MAX_SUB_CATEGORIES_PER_NOTE {
            return Err(ApiError::bad_request(format!(
                "A note can have at most {MAX_SUB_CATEGORIES_PER_NOTE} sub-categories"
            )));
        }
    }
    Ok(())
}

/// Returns the categories with trimmed names once every rule holds.
pub(crate) fn validate_categories(categories: &[Category]) -> Result<Vec<Category>> {
    if categories.is_empty() {
        return Err(ApiError::bad_request("At least one category is required"));
    }

    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(categories.len());
    for category in categories {
        let name = category.name.trim();
        if name.is_empty() {
            return Err(ApiError::bad_request("Category name cannot be empty"));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(ApiError::bad_request(format!(
                "Duplicate category name: {name}"
            )));
        }
        normalized.push(Category {
            name: name.to_string(),
            ..category.clone()
        });
    }
    Ok(normalized)
}

pub(crate) fn validate_sub_category(request: &SubCategoryRequest) -> Result<()> {
    if request.category_name.trim().is_empty() {
        return Err(ApiError::bad_request("Category name is required"));
    }
    if request.sub_cat_name.trim().is_empty() {
        return Err(ApiError::bad_request("Sub-category name is required"));
    }
    Ok(())
}
