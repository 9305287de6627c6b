// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity verification and tenant membership lookup.

use async_trait::async_trait;

use crate::error::TribunaError;
use crate::types::{TenantId, UserId};

/// Verifies caller credentials against the platform identity service.
///
/// A definitive rejection is [`TribunaError::Unauthenticated`]; an outage
/// of the identity service itself must surface as a different variant so
/// the gateway does not blame the caller for it.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verifies the opaque bearer credential and returns the principal it
    /// belongs to.
    async fn verify(&self, credential: &str) -> Result<UserId, TribunaError>;
}

/// Resolves a verified principal to its tenant membership.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Returns the tenant the principal belongs to, or `None` when the
    /// principal has no membership at all.
    async fn tenant_of(&self, user: &UserId) -> Result<Option<TenantId>, TribunaError>;
}
