//! Job providers: one adapter per external job-listing API.
//!
//! Each adapter issues a single GET, decodes the provider's own schema, and
//! maps every posting to a `JobRecord`. Adapters never retry; fallback
//! between providers is the fetcher's job.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::JobRecord;

pub mod adzuna;
pub mod jsearch;
pub mod muse;

pub use adzuna::AdzunaProvider;
pub use jsearch::JSearchProvider;
pub use muse::MuseProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Provider returned no jobs")]
    NoResults,
}

/// A source of job postings. The fetcher walks an ordered list of these.
#[async_trait]
pub trait JobProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// False when a required credential is missing; the provider is then
    /// skipped without counting as a failure.
    fn is_eligible(&self) -> bool {
        true
    }

    async fn fetch(
        &self,
        query: &str,
        location: Option<&str>,
    ) -> Result<Vec<JobRecord>, ProviderError>;
}

/// Builds the HTTP client shared by all adapters.
pub fn build_http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to build HTTP client")
}

/// Sends a request and decodes a successful JSON body.
/// Non-2xx responses become `ProviderError::Api` with the body as message.
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    debug!("{provider} responded with {} bytes", body.len());
    serde_json::from_str(&body).map_err(ProviderError::Parse)
}

/// Decodes a result list without letting one bad value sink the response.
/// Anything other than an array reads as empty; entries that fail to decode
/// are logged and skipped.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Skipping malformed entry: {e}");
                None
            }
        })
        .collect())
}

/// Joins non-empty names with `", "`, or `None` when nothing is left.
pub(crate) fn join_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let joined = names
        .into_iter()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    (!joined.is_empty()).then_some(joined)
}

/// Returns the value when it holds non-blank text.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
