// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the gateway's external collaborators.
//!
//! The identity service and the durable audit store are owned by other
//! systems; the gateway depends on them only through these traits, all
//! `#[async_trait]` for dynamic dispatch.

pub mod audit;
pub mod identity;

pub use audit::AuditStore;
pub use identity::{IdentityVerifier, TenantDirectory};
