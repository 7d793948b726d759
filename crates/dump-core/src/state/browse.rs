//! Folder rows built from `note_counts` facets.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;

use crate::api::NotesApi;
use crate::models::{Filter, NoteCounts, DATE_GROUP_ORDER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FolderKind {
    Category,
    DateGroup,
    MimeType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRow {
    pub kind: FolderKind,
    pub name: String,
    pub count: u64,
}

impl FolderRow {
    /// List filter that opens this folder.
    pub fn filter(&self, today: NaiveDate) -> Filter {
        match self.kind {
            FolderKind::Category => Filter::category(self.name.clone()),
            FolderKind::DateGroup => Filter::date_group(self.name.clone(), today),
            FolderKind::MimeType => Filter::ByMimeGroup(self.name.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseSnapshot {
    pub is_loading: bool,
    pub error: Option<String>,
    pub categories: Vec<FolderRow>,
    pub date_groups: Vec<FolderRow>,
    pub mime_types: Vec<FolderRow>,
}

pub struct BrowseState {
    api: Arc<dyn NotesApi>,
    state: watch::Sender<BrowseSnapshot>,
}

impl std::fmt::Debug for BrowseState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("BrowseState")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl BrowseState {
    pub fn new(api: Arc<dyn NotesApi>) -> Self {
        Self {
            api,
            state: watch::Sender::new(BrowseSnapshot::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<BrowseSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> BrowseSnapshot {
        self.state.borrow().clone()
    }

    /// Fetches facet counts. A failure clears every row.
    pub async fn load_counts(&self) {
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

        let result = self.api.fetch_counts().await;

        self.state.send_modify(|state| {
            match result {
                Ok(counts) => apply_counts(state, counts),
                Err(error) => {
                    tracing::warn!("Failed to load note counts: {}", error);
                    state.error = Some(error.to_string());
                    state.categories.clear();
                    state.date_groups.clear();
                    state.mime_types.clear();
                }
            }
            state.is_loading = false;
        });
    }
}

fn apply_counts(state: &mut BrowseSnapshot, counts: NoteCounts) {
    state.categories = sorted_rows(counts.categories, FolderKind::Category);
    state.mime_types = sorted_rows(counts.mime_types, FolderKind::MimeType);
    state.date_groups = date_group_rows(counts.date_groups);
}

fn sorted_rows(counts: BTreeMap<String, u64>, kind: FolderKind) -> Vec<FolderRow> {
    let mut rows: Vec<FolderRow> = counts
        .into_iter()
        .map(|(name, count)| FolderRow { kind, name, count })
        .collect();
    rows.sort_by(|lhs, rhs| {
        lhs.name
            .to_lowercase()
            .cmp(&rhs.name.to_lowercase())
            .then_with(|| lhs.name.cmp(&rhs.name))
    });
    rows
}

/// Known groups in calendar order, then the rest alphabetically.
fn date_group_rows(mut counts: BTreeMap<String, u64>) -> Vec<FolderRow> {
    let mut rows: Vec<FolderRow> = DATE_GROUP_ORDER
        .iter()
        .filter_map(|name| {
            counts.remove(*name).map(|count| FolderRow {
                kind: FolderKind::DateGroup,
                name: (*name).to_string(),
                count,
            })
        })
        .collect();
    rows.extend(sorted_rows(counts, FolderKind::DateGroup));
    rows
}
