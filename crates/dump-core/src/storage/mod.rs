//! Local persistence for per-user client flags.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{ApiError, Result};

/// Persists the "onboarding complete" flag, scoped to a user id.
pub trait OnboardingStore: Send + Sync {
    fn is_onboarding_completed(&self, user_id: &str) -> Result<bool>;
    fn mark_onboarding_completed(&self, user_id: &str) -> Result<()>;
}

impl<T: OnboardingStore + ?Sized> OnboardingStore for Arc<T> {
    fn is_onboarding_completed(&self, user_id: &str) -> Result<bool> {
        (**self).is_onboarding_completed(user_id)
    }

    fn mark_onboarding_completed(&self, user_id: &str) -> Result<()> {
        (**self).mark_onboarding_completed(user_id)
    }
}

/// Key under which the flag is stored.
pub fn onboarding_flag_key(user_id: &str) -> String {
    format!("onboarding_completed_{}", user_id.trim())
}

/// Flags kept as a JSON object of `key -> bool` in a single file.
#[derive(Debug)]
pub struct FileOnboardingStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileOnboardingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, bool>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|error| {
            ApiError::Storage(format!(
                "Failed to parse flags at {}: {error}",
                self.path.display()
            ))
        })
    }

    fn save(&self, flags: &BTreeMap<String, bool>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(flags)
            .map_err(|error| ApiError::Storage(format!("Failed to serialize flags: {error}")))?;
        std::fs::write(&self.path, serialized)?;
        Ok(())
    }
}

impl OnboardingStore for FileOnboardingStore {
    fn is_onboarding_completed(&self, user_id: &str) -> Result<bool> {
        Ok(self
            .load()?
            .get(&onboarding_flag_key(user_id))
            .copied()
            .unwrap_or(false))
    }

    fn mark_onboarding_completed(&self, user_id: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ApiError::Storage("Flag store lock poisoned".to_string()))?;
        let mut flags = self.load()?;
        flags.insert(onboarding_flag_key(user_id), true);
        self.save(&flags)
    }
}

/// Process-local store, used when nothing should touch disk.
#[derive(Debug, Default)]
pub struct MemoryOnboardingStore {
    completed: Mutex<HashSet<String>>,
}

impl MemoryOnboardingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OnboardingStore for MemoryOnboardingStore {
    fn is_onboarding_completed(&self, user_id: &str) -> Result<bool> {
        let completed = self
            .completed
            .lock()
            .map_err(|_| ApiError::Storage("Flag store lock poisoned".to_string()))?;
        Ok(completed.contains(&onboarding_flag_key(user_id)))
    }

    fn mark_onboarding_completed(&self, user_id: &str) -> Result<()> {
        self.completed
            .lock()
            .map_err(|_| ApiError::Storage("Flag store lock poisoned".to_string()))?
            .insert(onboarding_flag_key(user_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_scopes_flag_per_user() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags").join("onboarding.json");
        let store = FileOnboardingStore::new(&path);

        assert!(!store.is_onboarding_completed("user-a").unwrap());
        store.mark_onboarding_completed("user-a").unwrap();
        assert!(store.is_onboarding_completed("user-a").unwrap());
        assert!(!store.is_onboarding_completed("user-b").unwrap());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("onboarding_completed_user-a"));

        let reopened = FileOnboardingStore::new(&path);
        assert!(reopened.is_onboarding_completed("user-a").unwrap());
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("onboarding.json");
        std::fs::write(&path, "not json").unwrap();
        let error = FileOnboardingStore::new(&path)
            .is_onboarding_completed("user-a")
            .unwrap_err();
        assert!(matches!(error, ApiError::Storage(_)));
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryOnboardingStore::new();
        store.mark_onboarding_completed("u1").unwrap();
        assert!(store.is_onboarding_completed(" u1 ").unwrap());
    }
}
