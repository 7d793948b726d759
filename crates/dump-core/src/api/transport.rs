//! Authenticated JSON transport shared by every endpoint.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::TokenProvider;
use crate::config::{normalize_base_url, ClientConfig};
use crate::error::{ApiError, Result};
use crate::util::compact_text;

/// Issues bearer-authenticated requests against the API base URL.
///
/// Stateless apart from the connection pool; safe to share between state
/// containers.
#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("tokens", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let base_url = normalize_base_url(&config.api_base_url)?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(ApiError::Network)?;
        Ok(Self {
            base_url,
            client,
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET` with query pairs, decoding a JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let mut request = self.request(Method::GET, path).await?;
        if !query.is_empty() {
            request = request.query(query);
        }
        let body = self.execute(request, path).await?;
        decode(&body)
    }

    /// `POST` with a JSON body, decoding a JSON response.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(ApiError::EncodingFailed)?;
        let request = self
            .request(Method::POST, path)
            .await?
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        let body = self.execute(request, path).await?;
        decode(&body)
    }

    /// `POST` whose response body is ignored.
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let payload = serde_json::to_vec(body).map_err(ApiError::EncodingFailed)?;
        let request = self
            .request(Method::POST, path)
            .await?
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        self.execute(request, path).await?;
        Ok(())
    }

    /// Unauthenticated binary `PUT` to a signed blob-store URL.
    pub async fn put_bytes(&self, signed_url: &str, content_type: &str, bytes: Vec<u8>) -> Result<()> {
        let url = Url::parse(signed_url.trim())
            .map_err(|error| ApiError::InvalidUrl(format!("Invalid upload URL: {error}")))?;
        tracing::debug!("PUT {} ({} bytes)", url.path(), bytes.len());

        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(ApiError::Network)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                "Blob upload failed with HTTP {}: {}",
                status.as_u16(),
                compact_text(&body)
            );
            return Err(ApiError::UploadFailed(status.as_u16()));
        }
        Ok(())
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        let token = self.tokens.bearer_token().await.map_err(|error| {
            tracing::warn!("No bearer token for {}: {}", path, error);
            ApiError::NoAuthToken
        })?;
        tracing::debug!("{} {}", method, path);
        Ok(self
            .client
            .request(method, url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json"))
    }

    async fn execute(&self, request: RequestBuilder, path: &str) -> Result<Vec<u8>> {
        let response = request.send().await.map_err(ApiError::Network)?;
        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::Network)?;
        if !status.is_success() {
            tracing::debug!(
                "{} returned HTTP {}: {}",
                path,
                status.as_u16(),
                compact_text(&String::from_utf8_lossy(&body))
            );
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        Ok(body.to_vec())
    }

    fn url(&self, path: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&raw).map_err(|error| ApiError::InvalidUrl(format!("{raw}: {error}")))
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(ApiError::DecodingFailed)
}
