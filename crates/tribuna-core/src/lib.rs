// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tribuna search gateway.
//!
//! This crate provides the shared domain types, the error taxonomy, and the
//! traits behind which the gateway's external collaborators (identity
//! service, audit store) live. Everything else in the workspace depends on
//! this crate and nothing here depends back.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TribunaError;
pub use types::{
    AuditRecord, SearchKind, SearchOutcome, SearchRequest, TenantId, TenantIdentity, UserId,
};

pub use traits::{AuditStore, IdentityVerifier, TenantDirectory};
