// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only audit ledger persisted to SQLite.
//!
//! Every request that reaches the upstream call phase leaves exactly one
//! row here, successful or not. The gateway never updates or deletes rows;
//! retention is an operator concern.

use async_trait::async_trait;
use rusqlite::params;
use tracing::debug;

use tribuna_core::{AuditRecord, AuditStore, TenantId, TribunaError, UserId};

use crate::database::Database;

/// SQLite-backed audit trail.
///
/// All operations go through the single tokio-rusqlite background thread
/// owned by [`Database`].
pub struct AuditLedger {
    db: Database,
}

impl AuditLedger {
    /// Create a ledger on top of an opened database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Most recent audit rows for a tenant, newest first.
    pub async fn recent_for_tenant(
        &self,
        tenant: &TenantId,
        limit: u32,
    ) -> Result<Vec<AuditRecord>, TribunaError> {
        let tenant_id = tenant.0.clone();
        self.db
            .connection()
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, tenant_id, action, tribunal_code, query_text,
                            result_count, latency_ms, status_code, error_message, created_at
                     FROM audit_log WHERE tenant_id = ?1
                     ORDER BY created_at DESC LIMIT ?2",
                )?;
                let rows = stmt.query_map(params![tenant_id, limit], |row| {
                    Ok(AuditRecord {
                        id: row.get(0)?,
                        user_id: UserId(row.get(1)?),
                        tenant_id: TenantId(row.get(2)?),
                        action: row.get(3)?,
                        tribunal_code: row.get(4)?,
                        query_text: row.get(5)?,
                        result_count: row.get(6)?,
                        latency_ms: row.get(7)?,
                        status_code: row.get(8)?,
                        error_message: row.get(9)?,
                        created_at: row.get(10)?,
                    })
                })?;
                let mut records = Vec::new();
                for row in rows {
                    records.push(row?);
                }
                Ok(records)
            })
            .await
            .map_err(crate::database::map_tr_err)
    }

    /// Number of audit rows recorded for a tenant.
    pub async fn count_for_tenant(&self, tenant: &TenantId) -> Result<u64, TribunaError> {
        let tenant_id = tenant.0.clone();
        self.db
            .connection()
            .call(move |conn| {
                let count: u64 = conn.query_row(
                    "SELECT COUNT(*) FROM audit_log WHERE tenant_id = ?1",
                    params![tenant_id],
                    |row| row.get(0),
                )?;
                Ok(count)
            })
            .await
            .map_err(crate::database::map_tr_err)
    }
}

#[async_trait]
impl AuditStore for AuditLedger {
    async fn append(&self, record: &AuditRecord) -> Result<(), TribunaError> {
        let id = record.id.clone();
        let user_id = record.user_id.0.clone();
        let tenant_id = record.tenant_id.0.clone();
        let action = record.action.clone();
        let tribunal_code = record.tribunal_code.clone();
        let query_text = record.query_text.clone();
        let result_count = record.result_count;
        let latency_ms = record.latency_ms;
        let status_code = record.status_code;
        let error_message = record.error_message.clone();
        let created_at = record.created_at.clone();

        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO audit_log (id, user_id, tenant_id, action, tribunal_code, \
                     query_text, result_count, latency_ms, status_code, error_message, \
                     created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                    params![
                        id,
                        user_id,
                        tenant_id,
                        action,
                        tribunal_code,
                        query_text,
                        result_count,
                        latency_ms,
                        status_code,
                        error_message,
                        created_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;

        debug!(
            tenant_id = %record.tenant_id.0,
            user_id = %record.user_id.0,
            tribunal = %record.tribunal_code,
            status_code = record.status_code,
            result_count = record.result_count,
            "audit row appended"
        );

        Ok(())
    }
}
