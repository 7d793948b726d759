//! Bearer-token supply for authenticated API requests.
//!
//! The transport asks its [`TokenProvider`] for a token before every request
//! and never caches one itself. Providers are free to cache internally.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No signed-in user")]
    SignedOut,
    #[error("Token refresh failed: {0}")]
    Refresh(String),
    #[error("Secure storage error: {0}")]
    SecureStorage(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Source of ID tokens for the signed-in user.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> AuthResult<String>;
}

#[async_trait]
impl<T: TokenProvider + ?Sized> TokenProvider for Arc<T> {
    async fn bearer_token(&self) -> AuthResult<String> {
        (**self).bearer_token().await
    }
}

/// Provider that always hands out the same token.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("StaticToken").field(&"[REDACTED]").finish()
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn bearer_token(&self) -> AuthResult<String> {
        let token = self.0.trim();
        if token.is_empty() {
            return Err(AuthError::SignedOut);
        }
        Ok(token.to_string())
    }
}

/// Provider for a signed-out session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignedOut;

#[async_trait]
impl TokenProvider for SignedOut {
    async fn bearer_token(&self) -> AuthResult<String> {
        Err(AuthError::SignedOut)
    }
}
