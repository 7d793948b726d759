//! CLI bearer-token storage with secure keychain persistence.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

use async_trait::async_trait;
#[cfg(not(test))]
use keyring::Entry;

use dump_core::auth::{AuthError, AuthResult, TokenProvider};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "dump-cli";

/// Environment override that takes precedence over the stored token.
pub const ID_TOKEN_ENV: &str = "DUMP_ID_TOKEN";

#[derive(Debug, Clone)]
pub struct TokenStore {
    username: String,
}

impl TokenStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            username: format!("id_token:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> AuthResult<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }

    #[cfg(not(test))]
    pub fn load(&self) -> AuthResult<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    pub fn load(&self) -> AuthResult<Option<String>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        Ok(guard.get(&self.username).cloned())
    }

    #[cfg(not(test))]
    pub fn save(&self, token: &str) -> AuthResult<()> {
        self.entry()?
            .set_password(token)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }

    #[cfg(test)]
    pub fn save(&self, token: &str) -> AuthResult<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.insert(self.username.clone(), token.to_string());
        Ok(())
    }

    #[cfg(not(test))]
    pub fn clear(&self) -> AuthResult<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    pub fn clear(&self) -> AuthResult<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

/// Where the token for a request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    Keychain,
}

/// Token provider for one CLI profile. Reads fresh on every request.
#[derive(Debug, Clone)]
pub struct ProfileTokenProvider {
    store: TokenStore,
}

impl ProfileTokenProvider {
    pub fn new(profile_name: &str) -> Self {
        Self {
            store: TokenStore::new(profile_name),
        }
    }

    pub fn resolve(&self) -> AuthResult<Option<(String, TokenSource)>> {
        if let Some(token) = env_token() {
            return Ok(Some((token, TokenSource::Environment)));
        }
        Ok(self
            .store
            .load()?
            .and_then(|token| normalize_token(&token))
            .map(|token| (token, TokenSource::Keychain)))
    }
}

#[async_trait]
impl TokenProvider for ProfileTokenProvider {
    async fn bearer_token(&self) -> AuthResult<String> {
        self.resolve()?
            .map(|(token, _)| token)
            .ok_or(AuthError::SignedOut)
    }
}

pub fn normalize_token(token: &str) -> Option<String> {
    let token = token.trim();
    let token = token
        .strip_prefix("Bearer ")
        .or_else(|| token.strip_prefix("bearer "))
        .unwrap_or(token)
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn env_token() -> Option<String> {
    std::env::var(ID_TOKEN_ENV)
        .ok()
        .and_then(|token| normalize_token(&token))
}
