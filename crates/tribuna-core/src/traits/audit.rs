// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable store for the append-only audit trail.

use async_trait::async_trait;

use crate::error::TribunaError;
use crate::types::AuditRecord;

/// Append-only sink for audit rows.
///
/// Implementations must never mutate a record after it is written. Callers
/// that cannot tolerate failure (the gateway's audit recorder) catch and
/// log the error rather than letting it reach the response path.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persists one audit row.
    async fn append(&self, record: &AuditRecord) -> Result<(), TribunaError>;
}
