// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation of [`TribunaError`] into HTTP responses.
//!
//! This is the only place a status code is chosen. Handlers and the audit
//! recorder both go through [`status_for`], so the audited status always
//! matches what the caller received.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use tribuna_core::TribunaError;

/// Error response body. Every non-2xx answer uses this shape.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error description.
    pub error: String,
}

/// The HTTP status a given error maps to.
///
/// `Upstream` carries the status the search API answered with and passes
/// it through unchanged, so a caller can tell an upstream 429 from this
/// gateway's own quota 429 only by the message text.
pub fn status_for(err: &TribunaError) -> StatusCode {
    match err {
        TribunaError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        TribunaError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        TribunaError::Unaffiliated(_) => StatusCode::FORBIDDEN,
        TribunaError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
        TribunaError::Upstream { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
        TribunaError::Config(_)
        | TribunaError::Transport { .. }
        | TribunaError::Storage { .. }
        | TribunaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the JSON error response for an error.
pub fn error_response(err: &TribunaError) -> Response {
    (
        status_for(err),
        Json(ErrorResponse {
            error: client_message(err),
        }),
    )
        .into_response()
}

/// The message shown to the caller. Storage detail stays in the log.
fn client_message(err: &TribunaError) -> String {
    match err {
        TribunaError::Storage { .. } => "internal storage error".to_string(),
        other => other.to_string(),
    }
}
