// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Tribuna workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a tenant (law firm / organization).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

/// Unique identifier for an authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// A fully resolved caller: verified principal plus tenant membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantIdentity {
    pub user_id: UserId,
    pub tenant_id: TenantId,
}

/// The supported search modes, named after the wire values the caller sends.
///
/// `Numero` is an exact process-number lookup, `Parte` matches party and
/// counsel names, `Classe` matches the procedural class code, and `Avancada`
/// passes the query text through as a raw query-string expression.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchKind {
    Numero,
    Parte,
    Classe,
    Avancada,
}

/// A validated search request, ready for the upstream client.
///
/// The gateway guarantees `tribunal_code` and `query_text` are non-empty
/// before one of these is constructed; the upstream client never sees an
/// incomplete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Court alias, e.g. `tjmg` or `trf1`. Selects the upstream index.
    pub tribunal_code: String,
    pub kind: SearchKind,
    pub query_text: String,
    /// Internal client record this search was run on behalf of, if any.
    /// Carried through to the request log; not part of the upstream query.
    pub related_client_id: Option<String>,
    /// 1-based result page. Absent and `1` are the same request.
    pub page: Option<u32>,
}

/// Result envelope returned to the caller, mirroring the upstream shape.
///
/// Hit records are kept as opaque JSON and passed through unmodified;
/// only the envelope (`hits.total.value` plus the hit array) is typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub hits: HitEnvelope,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitEnvelope {
    pub total: TotalHits,
    #[serde(default)]
    pub hits: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalHits {
    pub value: u64,
}

impl SearchOutcome {
    pub fn new(total: u64, hits: Vec<serde_json::Value>) -> Self {
        Self {
            hits: HitEnvelope {
                total: TotalHits { value: total },
                hits,
            },
        }
    }

    /// Total matching documents as reported by the upstream, which may
    /// exceed the number of hit records on this page.
    pub fn total_hits(&self) -> u64 {
        self.hits.total.value
    }

    /// The raw hit records for this page.
    pub fn raw_hits(&self) -> &[serde_json::Value] {
        &self.hits.hits
    }
}

/// One append-only audit row, written after every request that reached the
/// upstream call phase, successful or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: String,
    pub user_id: UserId,
    pub tenant_id: TenantId,
    /// Operation name, `search` for every record this gateway writes.
    pub action: String,
    pub tribunal_code: String,
    pub query_text: String,
    pub result_count: u64,
    pub latency_ms: u64,
    /// The HTTP status the caller received for this request.
    pub status_code: u16,
    pub error_message: Option<String>,
    /// ISO 8601 timestamp, UTC.
    pub created_at: String,
}
