//! Client configuration.
//!
//! Provides the `ClientConfig` struct shared by every front end to locate the
//! backend and tune paging, search debounce, and request timeouts.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::util::{is_http_url, normalize_text_option};

pub const DEFAULT_API_BASE_URL: &str = "https://thedump.ai";
pub const DEFAULT_PAGE_SIZE: u32 = 30;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const FALLBACK_TIME_ZONE: &str = "UTC";

/// Runtime configuration for the API client and state containers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// IANA zone identifier sent as `tz` with date-range queries.
    #[serde(default)]
    pub time_zone: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            time_zone: None,
        }
    }
}

impl ClientConfig {
    /// Default config with `DUMP_API_BASE_URL` / `DUMP_TIME_ZONE` / `TZ`
    /// overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(
            std::env::var("DUMP_API_BASE_URL").ok(),
            std::env::var("DUMP_TIME_ZONE")
                .ok()
                .or_else(|| std::env::var("TZ").ok()),
        )
    }

    /// Applies non-empty overrides, keeping current values otherwise.
    #[must_use]
    pub fn with_overrides(mut self, api_base_url: Option<String>, time_zone: Option<String>) -> Self {
        if let Some(url) = normalize_text_option(api_base_url) {
            self.api_base_url = url;
        }
        if let Some(zone) = normalize_text_option(time_zone) {
            self.time_zone = Some(zone);
        }
        self
    }

    /// Validated base URL without a trailing slash.
    pub fn normalized_base_url(&self) -> Result<String> {
        normalize_base_url(&self.api_base_url)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Zone identifier for `tz`, `UTC` when unset.
    pub fn time_zone(&self) -> String {
        normalize_text_option(self.time_zone.clone())
            .unwrap_or_else(|| FALLBACK_TIME_ZONE.to_string())
    }

    /// Page size clamped to at least one note.
    pub fn page_size(&self) -> u32 {
        self.page_size.max(1)
    }
}

/// Trim, require an http(s) scheme, and drop trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(ApiError::InvalidUrl(
            "API base URL must not be empty".to_string(),
        ));
    }
    if !is_http_url(&base) {
        return Err(ApiError::InvalidUrl(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(base)
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

const fn default_search_debounce_ms() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
