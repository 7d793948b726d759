//! Onboarding flow: choosing a category set and submitting it once.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use crate::api::NotesApi;
use crate::models::{Category, CategoryDraft};
use crate::presets::{find_preset, OnboardingPreset, ALL_DOMAINS};
use crate::storage::OnboardingStore;

pub const MIN_CATEGORIES: usize = 3;
pub const MAX_CATEGORIES: usize = 10;
pub const MAX_CATEGORY_NAME_CHARS: usize = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingSnapshot {
    pub selected_preset_id: Option<String>,
    pub categories: Vec<CategoryDraft>,
    pub active_domains: BTreeSet<String>,
    pub is_submitting: bool,
    pub error: Option<String>,
    pub has_completed_onboarding: bool,
}

impl OnboardingSnapshot {
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn is_category_count_valid(&self) -> bool {
        (MIN_CATEGORIES..=MAX_CATEGORIES).contains(&self.category_count())
    }

    pub fn categories_needed_message(&self) -> String {
        let count = self.category_count();
        if count < MIN_CATEGORIES {
            let needed = MIN_CATEGORIES - count;
            let noun = if needed == 1 { "category" } else { "categories" };
            format!("Add {needed} more {noun} to continue")
        } else if count > MAX_CATEGORIES {
            format!("Maximum {MAX_CATEGORIES} categories allowed")
        } else {
            "You can always add or change categories later".to_string()
        }
    }

    pub fn selected_preset(&self) -> Option<&'static OnboardingPreset> {
        self.selected_preset_id.as_deref().and_then(find_preset)
    }

    /// Suggestions from the active domains, minus names already chosen.
    pub fn available_suggestions(&self) -> Vec<&'static str> {
        let chosen: BTreeSet<String> = self
            .categories
            .iter()
            .map(|category| category.name.to_lowercase())
            .collect();
        ALL_DOMAINS
            .iter()
            .filter(|domain| self.active_domains.contains(domain.id))
            .flat_map(|domain| domain.suggestions.iter().copied())
            .filter(|suggestion| !chosen.contains(&suggestion.to_lowercase()))
            .collect()
    }

    fn contains_name(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.categories
            .iter()
            .any(|category| category.name.to_lowercase() == lowered)
    }
}

pub struct OnboardingState {
    api: Arc<dyn NotesApi>,
    store: Arc<dyn OnboardingStore>,
    user_id: String,
    state: watch::Sender<OnboardingSnapshot>,
}

impl std::fmt::Debug for OnboardingState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("OnboardingState")
            .field("user_id", &self.user_id)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl OnboardingState {
    pub fn new(
        api: Arc<dyn NotesApi>,
        store: Arc<dyn OnboardingStore>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            store,
            user_id: user_id.into().trim().to_string(),
            state: watch::Sender::new(OnboardingSnapshot::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<OnboardingSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> OnboardingSnapshot {
        self.state.borrow().clone()
    }

    /// Selects a preset by id. Unknown ids are ignored.
    pub fn select_preset(&self, preset_id: &str) -> bool {
        let Some(preset) = find_preset(preset_id) else {
            return false;
        };
        self.state.send_modify(|state| {
            state.selected_preset_id = Some(preset.id.to_string());
        });
        true
    }

    /// Adds a category unless it is blank, longer than 30 characters, a
    /// case-insensitive duplicate, or the list is full.
    pub fn add_category(&self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_CATEGORY_NAME_CHARS {
            return false;
        }
        self.state.send_if_modified(|state| {
            if state.contains_name(name) || state.categories.len() >= MAX_CATEGORIES {
                return false;
            }
            state.categories.push(CategoryDraft::new(name));
            true
        })
    }

    pub fn add_suggestion(&self, suggestion: &str) -> bool {
        self.add_category(suggestion)
    }

    pub fn remove_category(&self, id: Uuid) {
        self.state.send_if_modified(|state| {
            let before = state.categories.len();
            state.categories.retain(|category| category.id != id);
            state.categories.len() != before
        });
    }

    pub fn toggle_domain(&self, domain_id: &str) {
        let domain_id = domain_id.trim().to_string();
        self.state.send_modify(|state| {
            if !state.active_domains.remove(&domain_id) {
                state.active_domains.insert(domain_id);
            }
        });
    }

    pub fn update_definition(&self, id: Uuid, definition: &str) {
        self.update_draft(id, |draft| draft.definition = definition.to_string());
    }

    pub fn update_keywords(&self, id: Uuid, keywords: &str) {
        self.update_draft(id, |draft| draft.keywords = keywords.to_string());
    }

    /// Submits the selected preset. The custom option is not submittable.
    pub async fn submit_preset(&self) -> bool {
        let preset = self.state.borrow().selected_preset();
        match preset {
            Some(preset) if !preset.is_custom_option => self.submit(preset.drafts()).await,
            _ => false,
        }
    }

    /// Submits the user's own categories with their definitions.
    pub async fn submit_custom_categories(&self) -> bool {
        let drafts = self.state.borrow().categories.clone();
        self.submit_counted(drafts).await
    }

    /// Submits the user's own categories by name only.
    pub async fn skip_definitions(&self) -> bool {
        let drafts: Vec<CategoryDraft> = self
            .state
            .borrow()
            .categories
            .iter()
            .map(CategoryDraft::stripped)
            .collect();
        self.submit_counted(drafts).await
    }

    /// Persisted flag first, then the server: any existing category means
    /// onboarding already happened. A positive server answer is cached.
    pub async fn has_completed_onboarding(&self) -> bool {
        if self.user_id.is_empty() {
            return false;
        }

        match self.store.is_onboarding_completed(&self.user_id) {
            Ok(true) => {
                self.set_completed();
                return true;
            }
            Ok(false) => {}
            Err(error) => tracing::warn!("Failed to read onboarding flag: {}", error),
        }

        match self.api.fetch_counts().await {
            Ok(counts) if !counts.categories.is_empty() => {
                self.persist_completed();
                self.set_completed();
                true
            }
            Ok(_) => false,
            Err(error) => {
                tracing::warn!("Could not check existing categories: {}", error);
                false
            }
        }
    }

    async fn submit_counted(&self, drafts: Vec<CategoryDraft>) -> bool {
        if !(MIN_CATEGORIES..=MAX_CATEGORIES).contains(&drafts.len()) {
            self.state.send_modify(|state| {
                state.error = Some(state.categories_needed_message());
            });
            return false;
        }
        self.submit(drafts).await
    }

    async fn submit(&self, drafts: Vec<CategoryDraft>) -> bool {
        let started = self.state.send_if_modified(|state| {
            if state.is_submitting {
                return false;
            }
            state.is_submitting = true;
            state.error = None;
            true
        });
        if !started {
            return false;
        }

        let categories: Vec<Category> = drafts.iter().map(CategoryDraft::to_category).collect();
        let result = self.api.update_categories(&categories).await;

        match result {
            Ok(_) => {
                tracing::info!("Onboarding completed with {} categories", categories.len());
                self.persist_completed();
                self.state.send_modify(|state| {
                    state.is_submitting = false;
                    state.has_completed_onboarding = true;
                });
                true
            }
            Err(error) => {
                self.state.send_modify(|state| {
                    state.is_submitting = false;
                    state.error = Some(error.to_string());
                });
                false
            }
        }
    }

    fn update_draft(&self, id: Uuid, update: impl FnOnce(&mut CategoryDraft)) {
        self.state.send_if_modified(|state| {
            state
                .categories
                .iter_mut()
                .find(|draft| draft.id == id)
                .map(update)
                .is_some()
        });
    }

    fn persist_completed(&self) {
        if self.user_id.is_empty() {
            return;
        }
        if let Err(error) = self.store.mark_onboarding_completed(&self.user_id) {
            tracing::warn!("Failed to persist onboarding flag: {}", error);
        }
    }

    fn set_completed(&self) {
        self.state
            .send_if_modified(|state| !std::mem::replace(&mut state.has_completed_onboarding, true));
    }
}
