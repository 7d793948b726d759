//! Paged note list with cursor pagination, facets, and debounced search.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::debounce::Debouncer;
use crate::api::NotesApi;
use crate::config::ClientConfig;
use crate::models::{Filter, NotePreview, NoteQuery, PageCursor, QueryContext};
use crate::util::sort_case_insensitive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    LoadingInitial,
    Loaded,
    LoadingMore,
    Error,
}

/// Observable state of one list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesListSnapshot {
    pub notes: Vec<NotePreview>,
    pub cursor: Option<PageCursor>,
    pub has_more: bool,
    pub is_loading_initial: bool,
    pub is_loading_more: bool,
    pub error: Option<String>,
    pub search_query: String,
    pub selected_sub_category: Option<String>,
    pub available_sub_categories: Vec<String>,
    /// At least one initial load has completed successfully.
    pub loaded: bool,
}

impl NotesListSnapshot {
    pub const fn phase(&self) -> ListPhase {
        if self.is_loading_initial {
            ListPhase::LoadingInitial
        } else if self.is_loading_more {
            ListPhase::LoadingMore
        } else if self.error.is_some() {
            ListPhase::Error
        } else if self.loaded {
            ListPhase::Loaded
        } else {
            ListPhase::Idle
        }
    }
}

/// List state for one [`Filter`].
///
/// Initial load and load-more are independent single-flight slots: a call
/// while its slot is busy returns immediately. A refresh supersedes an
/// in-flight load-more, whose page is then dropped.
pub struct NotesListState {
    api: Arc<dyn NotesApi>,
    filter: Filter,
    page_size: u32,
    time_zone: String,
    state: watch::Sender<NotesListSnapshot>,
    refresh_epoch: AtomicU64,
    search: Debouncer,
}

impl std::fmt::Debug for NotesListState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("NotesListState")
            .field("filter", &self.filter)
            .field("page_size", &self.page_size)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl NotesListState {
    pub fn new(api: Arc<dyn NotesApi>, filter: Filter, config: &ClientConfig) -> Self {
        let snapshot = NotesListSnapshot {
            selected_sub_category: filter.initial_sub_category().map(ToString::to_string),
            ..Default::default()
        };
        Self {
            api,
            filter,
            page_size: config.page_size(),
            time_zone: config.time_zone(),
            state: watch::Sender::new(snapshot),
            refresh_epoch: AtomicU64::new(0),
            search: Debouncer::new(config.search_debounce()),
        }
    }

    pub const fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn subscribe(&self) -> watch::Receiver<NotesListSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> NotesListSnapshot {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> ListPhase {
        self.state.borrow().phase()
    }

    /// Reloads the first page, replacing the current notes.
    ///
    /// On failure the notes are cleared and the error is kept.
    pub async fn refresh(&self) {
        let started = self.state.send_if_modified(|state| {
            if state.is_loading_initial {
                return false;
            }
            state.is_loading_initial = true;
            state.is_loading_more = false;
            state.error = None;
            state.cursor = None;
            self.refresh_epoch.fetch_add(1, Ordering::SeqCst);
            true
        });
        if !started {
            return;
        }

        let query = self.build_query(None);
        let result = self.api.fetch_notes(&query).await;

        self.state.send_modify(|state| {
            match result {
                Ok(page) => {
                    state.notes = page.notes;
                    state.cursor = page.cursor;
                    state.has_more = page.has_more;
                    state.loaded = true;
                    self.rebuild_sub_categories(state);
                }
                Err(error) => {
                    tracing::debug!("Note list refresh failed: {}", error);
                    state.error = Some(error.to_string());
                    state.notes.clear();
                    state.cursor = None;
                    state.has_more = false;
                }
            }
            state.is_loading_initial = false;
        });
    }

    /// Appends the next page when `last_visible_id` is the last loaded note.
    ///
    /// No-op for `Recent`, when there is nothing more, or while either
    /// load is running. A failure keeps the loaded notes.
    pub async fn load_more_if_needed(&self, last_visible_id: &str) {
        if !self.filter.paginates() {
            return;
        }

        let mut cursor = None;
        let mut epoch = 0;
        let started = self.state.send_if_modified(|state| {
            if !state.has_more || state.is_loading_initial || state.is_loading_more {
                return false;
            }
            let is_last = state
                .notes
                .last()
                .is_some_and(|note| note.id == last_visible_id);
            if !is_last {
                return false;
            }
            state.is_loading_more = true;
            state.error = None;
            cursor.clone_from(&state.cursor);
            epoch = self.refresh_epoch.load(Ordering::SeqCst);
            true
        });
        if !started {
            return;
        }

        let query = self.build_query(cursor.as_ref());
        let result = self.api.fetch_notes(&query).await;

        self.state.send_if_modified(|state| {
            if self.refresh_epoch.load(Ordering::SeqCst) != epoch {
                tracing::debug!("Dropping page superseded by a refresh");
                return false;
            }
            match result {
                Ok(page) => {
                    state.notes.extend(page.notes);
                    state.cursor = page.cursor;
                    state.has_more = page.has_more;
                    self.rebuild_sub_categories(state);
                }
                Err(error) => {
                    tracing::debug!("Loading more notes failed: {}", error);
                    state.error = Some(error.to_string());
                }
            }
            state.is_loading_more = false;
            true
        });
    }

    /// Stores the search term and schedules a debounced refresh.
    ///
    /// Each call supersedes the previous pending refresh. The handle
    /// resolves to `true` if this call's refresh ran.
    pub fn set_search_query(self: &Arc<Self>, query: impl Into<String>) -> JoinHandle<bool> {
        let query = query.into();
        self.state.send_if_modified(|state| {
            if state.search_query == query {
                return false;
            }
            state.search_query = query;
            true
        });

        let this = Arc::clone(self);
        self.search.schedule(async move {
            this.refresh().await;
        })
    }

    /// Changes the sub-category filter and reloads.
    pub async fn select_sub_category(&self, name: Option<&str>) {
        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToString::to_string);
        self.state.send_if_modified(|state| {
            if state.selected_sub_category == name {
                return false;
            }
            state.selected_sub_category = name;
            true
        });
        self.refresh().await;
    }

    /// Clears the sub-category filter without reloading.
    pub fn clear_sub_category_filter(&self) {
        self.state.send_if_modified(|state| state.selected_sub_category.take().is_some());
    }

    /// Inserts a freshly created sub-category into the facet list.
    pub fn add_sub_category_to_list(&self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let lowered = name.to_lowercase();
        self.state.send_if_modified(|state| {
            if state
                .available_sub_categories
                .iter()
                .any(|existing| existing.to_lowercase() == lowered)
            {
                return false;
            }
            state.available_sub_categories.push(name.to_string());
            sort_case_insensitive(&mut state.available_sub_categories);
            true
        });
    }

    fn build_query(&self, cursor: Option<&PageCursor>) -> NoteQuery {
        let state = self.state.borrow();
        self.filter.note_query(&QueryContext {
            page_size: self.page_size,
            cursor,
            search: &state.search_query,
            sub_category: state.selected_sub_category.as_deref(),
            time_zone: &self.time_zone,
        })
    }

    /// Facets come from the loaded notes of a category list, and only while
    /// no sub-category filter narrows them down.
    fn rebuild_sub_categories(&self, state: &mut NotesListSnapshot) {
        if !matches!(self.filter, Filter::ByCategory { .. }) || state.selected_sub_category.is_some()
        {
            return;
        }
        let names: BTreeSet<String> = state
            .notes
            .iter()
            .filter_map(|note| note.sub_category_names.as_ref())
            .flatten()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
            .collect();
        let mut names: Vec<String> = names.into_iter().collect();
        sort_case_insensitive(&mut names);
        state.available_sub_categories = names;
    }
}
