// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use tracing::debug;

use tribuna_core::TribunaError;

/// Convert a tokio-rusqlite error into TribunaError::Storage.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> TribunaError {
    TribunaError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the SQLite file behind the audit trail.
///
/// Wraps a single [`tokio_rusqlite::Connection`]; every operation runs on
/// its background thread, so writes are serialized and SQLITE_BUSY does not
/// occur under concurrent request load. Cloning is cheap and shares the
/// same connection.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open the database at `path`, creating the file if needed, and bring
    /// the schema up to date.
    ///
    /// PRAGMAs are applied before migrations run. With `wal_mode` off the
    /// journal stays in SQLite's default rollback mode, for filesystems
    /// where WAL does not work.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, TribunaError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| TribunaError::Storage {
                source: Box::new(e),
            })?;

        let journal = if wal_mode { "WAL" } else { "DELETE" };
        let pragmas = format!(
            "PRAGMA journal_mode = {journal};
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;"
        );
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(&pragmas)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(crate::migrations::run_migrations)
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(e) => e,
                other => TribunaError::Storage {
                    source: Box::new(other),
                },
            })?;

        debug!(path, wal_mode, "database opened, migrations applied");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL so all committed rows land in the main file.
    ///
    /// Called on shutdown. Harmless when the journal is not in WAL mode.
    pub async fn close(&self) -> Result<(), TribunaError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
