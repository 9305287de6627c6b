// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations using refinery.
//!
//! The SQL files under `migrations/` are compiled into the binary via
//! `embed_migrations!` and applied automatically when the database opens.

use tribuna_core::TribunaError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
///
/// Refinery records applied versions in its own `refinery_schema_history`
/// table, so re-running on an up-to-date database is a no-op.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), TribunaError> {
    embedded::migrations::runner().run(conn).map_err(|e| {
        TribunaError::Storage {
            source: Box::new(e),
        }
    })?;
    Ok(())
}
