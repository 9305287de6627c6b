// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for tenant-scoped judicial-records search.
//!
//! One POST route takes a search request through validation, tenant
//! resolution, the per-tenant quota gate, and a retry-wrapped upstream
//! call, then writes an audit row. The identity service and audit store
//! are injected behind the `tribuna-core` traits, so the binary wires the
//! real implementations and tests wire stubs.

pub mod audit;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use audit::AuditRecorder;
pub use auth::TenantResolver;
pub use server::{GatewayState, ServerConfig, build_router, start_server};
