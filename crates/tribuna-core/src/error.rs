// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tribuna search gateway.

use thiserror::Error;

/// The primary error type used across all Tribuna components.
///
/// Only the gateway crate translates these into HTTP statuses; everything
/// below the handler returns typed variants and never shapes a response.
#[derive(Debug, Error)]
pub enum TribunaError {
    /// Configuration errors (missing upstream API key, invalid TOML, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// The inbound request is malformed or missing required fields.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No credential was presented, or the identity service rejected it.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The credential maps to a verified principal with no tenant membership.
    #[error("no tenant affiliation: {0}")]
    Unaffiliated(String),

    /// The tenant's fixed-window search quota is exhausted.
    #[error("search quota exceeded for tenant {tenant}")]
    QuotaExceeded { tenant: String },

    /// The upstream search API answered with a non-success status.
    #[error("upstream returned status {status}")]
    Upstream { status: u16, body: String },

    /// The exchange with the upstream failed without a status: connect or
    /// TLS errors, the per-attempt timeout, or an unreadable response body.
    #[error("upstream transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Durable-store errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TribunaError {
    /// True when the error carries an upstream HTTP status in `statuses`.
    ///
    /// This is the retry predicate used by the gateway: only upstream
    /// responses with a configured status (429 by default) are worth a
    /// second attempt. Transport failures and everything else short-circuit.
    pub fn has_upstream_status(&self, statuses: &[u16]) -> bool {
        match self {
            TribunaError::Upstream { status, .. } => statuses.contains(status),
            _ => false,
        }
    }
}
