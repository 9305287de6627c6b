// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the Tribuna audit trail.
//!
//! A single [`Database`] handle owns the tokio-rusqlite background thread;
//! [`AuditLedger`] provides append and read operations on top of it. Schema
//! changes ship as embedded refinery migrations and run on open.

pub mod database;
pub mod ledger;
mod migrations;

pub use database::Database;
pub use ledger::AuditLedger;
