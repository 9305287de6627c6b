// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the search gateway.
//!
//! Handles POST / (tenant-scoped search) and GET /health. A search request
//! moves through validation, tenant resolution, the quota gate, and the
//! retry-wrapped upstream call, in that order; the first stage to reject
//! ends the request. Everything past the quota gate is audited.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tribuna_core::{SearchKind, SearchOutcome, SearchRequest, TribunaError};

use crate::error::{ErrorResponse, error_response, status_for};
use crate::server::GatewayState;

/// Request body for POST /.
///
/// Every field is optional at the serde layer so that absence maps to a 400
/// with a field-specific message instead of a generic deserialization error.
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    /// Court alias selecting the upstream index, e.g. `tjmg`.
    #[serde(default)]
    pub tribunal: Option<String>,
    /// One of `numero`, `parte`, `classe`, `avancada`.
    #[serde(rename = "searchType", default)]
    pub search_type: Option<String>,
    /// Query text, interpreted per `searchType`.
    #[serde(default)]
    pub query: Option<String>,
    /// Internal client record the search is run on behalf of.
    #[serde(rename = "clienteId", default)]
    pub cliente_id: Option<String>,
    /// 1-based result page.
    #[serde(default)]
    pub pagina: Option<u32>,
}

impl SearchBody {
    /// Validate the wire body into a [`SearchRequest`].
    fn into_search_request(self) -> Result<SearchRequest, TribunaError> {
        let tribunal = self.tribunal.as_deref().map(str::trim).unwrap_or("");
        if tribunal.is_empty() {
            return Err(TribunaError::InvalidRequest(
                "field 'tribunal' is required".to_string(),
            ));
        }
        if !tribunal.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TribunaError::InvalidRequest(
                "field 'tribunal' must be alphanumeric".to_string(),
            ));
        }

        let kind = match self.search_type.as_deref().map(str::trim) {
            None | Some("") => {
                return Err(TribunaError::InvalidRequest(
                    "field 'searchType' is required".to_string(),
                ));
            }
            Some(raw) => raw.parse::<SearchKind>().map_err(|_| {
                TribunaError::InvalidRequest(format!(
                    "unknown searchType '{raw}'; expected numero, parte, classe or avancada"
                ))
            })?,
        };

        let query = self.query.as_deref().map(str::trim).unwrap_or("");
        if query.is_empty() {
            return Err(TribunaError::InvalidRequest(
                "field 'query' is required".to_string(),
            ));
        }

        if self.pagina == Some(0) {
            return Err(TribunaError::InvalidRequest(
                "field 'pagina' is 1-based".to_string(),
            ));
        }

        Ok(SearchRequest {
            tribunal_code: tribunal.to_string(),
            kind,
            query_text: query.to_string(),
            related_client_id: self.cliente_id.filter(|id| !id.trim().is_empty()),
            page: self.pagina,
        })
    }
}

/// Response body for a successful search.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    /// Upstream result envelope, passed through unmodified.
    pub data: SearchOutcome,
    /// Always false; the gateway serves no cached results.
    pub cached: bool,
    /// Wall time of the upstream call phase, including retries.
    pub latency_ms: u64,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// POST /
///
/// Runs one tenant-scoped search against the upstream judicial-records API.
pub async fn post_search(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    payload: Result<Json<SearchBody>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return error_response(&TribunaError::InvalidRequest(format!(
                "malformed JSON body: {rejection}"
            )));
        }
    };

    let request = match body.into_search_request() {
        Ok(request) => request,
        Err(err) => return error_response(&err),
    };

    let identity = match state.resolver.resolve(&headers).await {
        Ok(identity) => identity,
        Err(err) => return error_response(&err),
    };

    if !state
        .quota
        .allow(&identity.tenant_id.0, state.quota_limit, state.quota_window)
    {
        return error_response(&TribunaError::QuotaExceeded {
            tenant: identity.tenant_id.0.clone(),
        });
    }

    // Upstream call phase. From here on, exactly one audit row is written.
    let started = Instant::now();
    let result = match state.datajud.as_ref() {
        Some(client) => {
            tribuna_resilience::execute(
                &state.retry,
                || client.search(&request),
                |err: &TribunaError| err.has_upstream_status(&state.retryable_statuses),
            )
            .await
        }
        None => Err(TribunaError::Config(
            "upstream API key not configured".to_string(),
        )),
    };
    let latency_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(outcome) => {
            state
                .audit
                .record(
                    &identity,
                    &request,
                    outcome.total_hits(),
                    latency_ms,
                    StatusCode::OK.as_u16(),
                    None,
                )
                .await;
            info!(
                tenant_id = %identity.tenant_id.0,
                tribunal = %request.tribunal_code,
                kind = %request.kind,
                related_client = ?request.related_client_id,
                total_hits = outcome.total_hits(),
                latency_ms,
                "search completed"
            );
            (
                StatusCode::OK,
                Json(SearchResponse {
                    success: true,
                    data: outcome,
                    cached: false,
                    latency_ms,
                }),
            )
                .into_response()
        }
        Err(err) => {
            let status = status_for(&err);
            state
                .audit
                .record(
                    &identity,
                    &request,
                    0,
                    latency_ms,
                    status.as_u16(),
                    Some(err.to_string()),
                )
                .await;
            warn!(
                tenant_id = %identity.tenant_id.0,
                tribunal = %request.tribunal_code,
                kind = %request.kind,
                status = status.as_u16(),
                latency_ms,
                error = %err,
                "search failed"
            );
            error_response(&err)
        }
    }
}

/// GET /health
///
/// Liveness endpoint, unauthenticated.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// Fallback for unsupported methods on the search route.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "method not allowed; use POST".to_string(),
        }),
    )
        .into_response()
}

/// Fallback for unknown paths, kept JSON-shaped like every other error.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "no such route".to_string(),
        }),
    )
        .into_response()
}
