// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort audit recording.
//!
//! The recorder wraps the durable [`AuditStore`] and never fails observably:
//! a failed append is logged and swallowed, so the response to the original
//! caller cannot depend on audit-write success.

use std::sync::Arc;

use tracing::warn;

use tribuna_core::{AuditRecord, AuditStore, SearchRequest, TenantIdentity};

/// Builds and persists one audit row per upstream call attempt cycle.
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Record the outcome of a search that reached the upstream call phase.
    ///
    /// `status_code` is the HTTP status the caller is about to receive.
    /// Infallible to the caller; append errors go to the log only.
    pub async fn record(
        &self,
        identity: &TenantIdentity,
        request: &SearchRequest,
        result_count: u64,
        latency_ms: u64,
        status_code: u16,
        error_message: Option<String>,
    ) {
        let record = AuditRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: identity.user_id.clone(),
            tenant_id: identity.tenant_id.clone(),
            action: "search".to_string(),
            tribunal_code: request.tribunal_code.clone(),
            query_text: request.query_text.clone(),
            result_count,
            latency_ms,
            status_code,
            error_message,
            created_at: chrono::Utc::now()
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
        };

        if let Err(err) = self.store.append(&record).await {
            warn!(
                error = %err,
                audit_id = %record.id,
                tenant_id = %record.tenant_id.0,
                "audit append failed, continuing without it"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tribuna_core::{SearchKind, TenantId, TribunaError, UserId};

    struct MemoryStore {
        records: Mutex<Vec<AuditRecord>>,
    }

    #[async_trait]
    impl AuditStore for MemoryStore {
        async fn append(&self, record: &AuditRecord) -> Result<(), TribunaError> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl AuditStore for BrokenStore {
        async fn append(&self, _record: &AuditRecord) -> Result<(), TribunaError> {
            Err(TribunaError::Storage {
                source: "disk full".into(),
            })
        }
    }

    fn identity() -> TenantIdentity {
        TenantIdentity {
            user_id: UserId("user-1".to_string()),
            tenant_id: TenantId("firm-a".to_string()),
        }
    }

    fn request() -> SearchRequest {
        SearchRequest {
            tribunal_code: "tjmg".to_string(),
            kind: SearchKind::Numero,
            query_text: "00012345620248130001".to_string(),
            related_client_id: None,
            page: None,
        }
    }

    #[tokio::test]
    async fn record_fills_generated_fields() {
        let store = Arc::new(MemoryStore {
            records: Mutex::new(Vec::new()),
        });
        let recorder = AuditRecorder::new(store.clone());

        recorder
            .record(&identity(), &request(), 5, 120, 200, None)
            .await;

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert!(!rec.id.is_empty());
        assert!(!rec.created_at.is_empty());
        assert_eq!(rec.action, "search");
        assert_eq!(rec.user_id, UserId("user-1".to_string()));
        assert_eq!(rec.tenant_id, TenantId("firm-a".to_string()));
        assert_eq!(rec.tribunal_code, "tjmg");
        assert_eq!(rec.result_count, 5);
        assert_eq!(rec.latency_ms, 120);
        assert_eq!(rec.status_code, 200);
        assert_eq!(rec.error_message, None);
    }

    #[tokio::test]
    async fn failure_records_keep_the_error_message() {
        let store = Arc::new(MemoryStore {
            records: Mutex::new(Vec::new()),
        });
        let recorder = AuditRecorder::new(store.clone());

        recorder
            .record(
                &identity(),
                &request(),
                0,
                250,
                503,
                Some("upstream returned status 503".to_string()),
            )
            .await;

        let records = store.records.lock().unwrap();
        assert_eq!(records[0].status_code, 503);
        assert_eq!(records[0].result_count, 0);
        assert_eq!(
            records[0].error_message.as_deref(),
            Some("upstream returned status 503")
        );
    }

    #[tokio::test]
    async fn append_failure_is_swallowed() {
        let recorder = AuditRecorder::new(Arc::new(BrokenStore));
        // Must return normally; the store error is logged, not raised.
        recorder
            .record(&identity(), &request(), 0, 10, 200, None)
            .await;
    }
}
