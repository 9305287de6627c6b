// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP implementation of the identity collaborator traits.
//!
//! [`HttpIdentityProvider`] speaks to the platform identity service:
//! session introspection (`GET /v1/session` with the caller's bearer
//! credential) and tenant membership lookup
//! (`GET /v1/users/{id}/tenant`). Both requests carry the gateway's
//! service key.
//!
//! Error posture: only a definitive 401/403 from the identity service
//! becomes [`TribunaError::Unauthenticated`]. An outage or unexpected
//! status is [`TribunaError::Internal`] - the caller must not be blamed
//! for infrastructure failures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;
use tribuna_core::{IdentityVerifier, TenantDirectory, TenantId, TribunaError, UserId};

/// Identity service calls are short metadata lookups; anything slower than
/// this is treated as an outage.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for session verification and membership lookup.
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct MembershipResponse {
    tenant_id: String,
}

impl HttpIdentityProvider {
    /// Creates a new identity client.
    ///
    /// The service key authenticates the gateway itself and rides along on
    /// every request as `x-service-key`; the caller's credential is added
    /// per request.
    pub fn new(base_url: &str, service_key: &str) -> Result<Self, TribunaError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-service-key",
            HeaderValue::from_str(service_key).map_err(|e| {
                TribunaError::Config(format!("invalid identity service key header value: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TribunaError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityProvider {
    async fn verify(&self, credential: &str) -> Result<UserId, TribunaError> {
        let url = format!("{}/v1/session", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|e| TribunaError::Internal(format!("identity service unreachable: {e}")))?;

        let status = response.status();
        debug!(status = %status, "session verification response");

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TribunaError::Unauthenticated(
                "credential rejected by identity service".into(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TribunaError::Internal(format!(
                "identity service returned {status}: {body}"
            )));
        }

        let session: SessionResponse = response.json().await.map_err(|e| {
            TribunaError::Internal(format!("failed to parse identity response: {e}"))
        })?;
        Ok(UserId(session.user_id))
    }
}

#[async_trait]
impl TenantDirectory for HttpIdentityProvider {
    async fn tenant_of(&self, user: &UserId) -> Result<Option<TenantId>, TribunaError> {
        let url = format!("{}/v1/users/{}/tenant", self.base_url, user.0);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TribunaError::Internal(format!("identity service unreachable: {e}")))?;

        let status = response.status();
        debug!(status = %status, user = %user.0, "membership lookup response");

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TribunaError::Internal(format!(
                "identity service returned {status}: {body}"
            )));
        }

        let membership: MembershipResponse = response.json().await.map_err(|e| {
            TribunaError::Internal(format!("failed to parse membership response: {e}"))
        })?;
        Ok(Some(TenantId(membership.tenant_id)))
    }
}
