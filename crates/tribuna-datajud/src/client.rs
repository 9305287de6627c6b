// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the DataJud search API.
//!
//! Provides [`DatajudClient`] which handles endpoint construction per
//! tribunal, API-key authentication, the per-attempt timeout, and
//! normalization of upstream failures into [`TribunaError`] variants at
//! this boundary. Retrying is not this client's concern; every call is a
//! single attempt.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;
use tribuna_core::{SearchOutcome, SearchRequest, TribunaError};

use crate::query;

/// HTTP client for upstream search calls.
///
/// One instance per process, cloned freely; the inner reqwest client pools
/// connections across clones.
#[derive(Debug, Clone)]
pub struct DatajudClient {
    client: reqwest::Client,
    base_url: String,
}

impl DatajudClient {
    /// Creates a new upstream client.
    ///
    /// # Arguments
    /// * `api_key` - upstream API key, sent as `Authorization: APIKey <key>`
    /// * `base_url` - upstream base URL from configuration
    /// * `timeout` - per-attempt request timeout
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, TribunaError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("APIKey {api_key}")).map_err(|e| {
                TribunaError::Config(format!("invalid upstream API key header value: {e}"))
            })?,
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| TribunaError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Runs one search attempt against the tribunal's index.
    ///
    /// Non-2xx statuses come back as [`TribunaError::Upstream`] with the
    /// response body preserved verbatim; connection, timeout, and response
    /// handling failures as [`TribunaError::Transport`]. The raw upstream
    /// error shape never leaks past this method.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, TribunaError> {
        let url = format!(
            "{}/api_publica_{}/_search",
            self.base_url,
            request.tribunal_code.to_lowercase()
        );
        let body = query::build_search_body(request);

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            TribunaError::Transport {
                message: format!("upstream request failed: {e}"),
                source: Some(Box::new(e)),
            }
        })?;

        let status = response.status();
        debug!(status = %status, tribunal = %request.tribunal_code, kind = %request.kind, "upstream response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TribunaError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| TribunaError::Transport {
            message: format!("failed to read upstream response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        let outcome: SearchOutcome =
            serde_json::from_str(&body).map_err(|e| TribunaError::Transport {
                message: format!("failed to parse upstream response: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(outcome)
    }
}
