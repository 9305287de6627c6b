// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tenant resolution for inbound requests.
//!
//! Every search request carries `Authorization: Bearer <credential>`. The
//! resolver verifies the credential against the identity service, then looks
//! up the principal's tenant membership. Requests are rejected fail-closed:
//! no credential is a 401, a verified principal without a tenant is a 403.

use std::sync::Arc;

use axum::http::HeaderMap;
use tracing::debug;

use tribuna_core::{IdentityVerifier, TenantDirectory, TenantIdentity, TribunaError};

/// Resolves a bearer credential to a [`TenantIdentity`].
///
/// Identity-service outages surface as `Internal`, never as 401: a caller
/// with a valid credential must not be told their credential is bad because
/// a backend was down.
#[derive(Clone)]
pub struct TenantResolver {
    verifier: Arc<dyn IdentityVerifier>,
    directory: Arc<dyn TenantDirectory>,
}

impl TenantResolver {
    pub fn new(verifier: Arc<dyn IdentityVerifier>, directory: Arc<dyn TenantDirectory>) -> Self {
        Self {
            verifier,
            directory,
        }
    }

    /// Resolve the caller behind `headers` to a verified tenant identity.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<TenantIdentity, TribunaError> {
        let credential = bearer_credential(headers)?;
        let user_id = self.verifier.verify(credential).await?;
        let tenant_id = self
            .directory
            .tenant_of(&user_id)
            .await?
            .ok_or_else(|| {
                TribunaError::Unaffiliated(format!(
                    "user {} has no tenant membership",
                    user_id.0
                ))
            })?;

        debug!(user_id = %user_id.0, tenant_id = %tenant_id.0, "caller resolved");
        Ok(TenantIdentity { user_id, tenant_id })
    }
}

/// Extract the bearer credential from the Authorization header.
fn bearer_credential(headers: &HeaderMap) -> Result<&str, TribunaError> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|credential| !credential.is_empty())
        .ok_or_else(|| {
            TribunaError::Unauthenticated(
                "missing or malformed Authorization header".to_string(),
            )
        })
}
