// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, CORS, and shared state, and runs the listener until the
//! shutdown token fires.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::Request;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{self, CorsLayer};
use tracing::warn;

use tribuna_core::TribunaError;
use tribuna_datajud::DatajudClient;
use tribuna_quota::QuotaTracker;
use tribuna_resilience::RetryPolicy;

use crate::audit::AuditRecorder;
use crate::auth::TenantResolver;
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Per-tenant fixed-window counters.
    pub quota: Arc<QuotaTracker>,
    /// Admitted searches per tenant per window.
    pub quota_limit: u32,
    /// Length of the quota window.
    pub quota_window: Duration,
    /// Backoff policy for the upstream call.
    pub retry: RetryPolicy,
    /// Upstream statuses worth another attempt.
    pub retryable_statuses: Vec<u16>,
    /// Upstream client; `None` until an API key is configured, in which
    /// case searches fail with a per-request 500.
    pub datajud: Option<Arc<DatajudClient>>,
    /// Credential-to-tenant resolution.
    pub resolver: TenantResolver,
    /// Best-effort audit writer.
    pub audit: AuditRecorder,
    /// Process start, for the health endpoint's uptime.
    pub started_at: std::time::Instant,
}

/// Server bind and CORS settings (mirrors GatewayConfig from tribuna-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Allowed CORS origin, `*` for any.
    pub cors_allowed_origin: String,
}

/// Build the gateway router.
///
/// Routes:
/// - POST / (search; other methods get a JSON 405)
/// - GET /health (unauthenticated liveness)
pub fn build_router(state: GatewayState, cors_allowed_origin: &str) -> Router {
    Router::new()
        .route(
            "/",
            post(handlers::post_search).fallback(handlers::method_not_allowed),
        )
        .route("/health", get(handlers::get_health))
        .fallback(handlers::not_found)
        .layer(cors_layer(cors_allowed_origin))
        .layer(middleware::from_fn(preflight_no_content))
        .with_state(state)
}

/// CORS layer from the configured origin.
///
/// An origin that fails header-value parsing disables cross-origin access
/// instead of widening it; same-origin and non-browser callers are
/// unaffected.
fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if allowed_origin == "*" {
        return layer.allow_origin(cors::Any);
    }
    match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!(
                origin = allowed_origin,
                "cors_allowed_origin is not a valid header value; cross-origin requests will be refused"
            );
            layer
        }
    }
}

/// Rewrite preflight answers to 204 No Content.
///
/// The CORS layer answers OPTIONS itself with an empty 200; the public
/// contract for this API pins 204 for `OPTIONS *`.
async fn preflight_no_content(request: Request, next: Next) -> Response {
    let is_options = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if is_options && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves until `shutdown` is
/// cancelled; in-flight requests are drained before return.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), TribunaError> {
    let app = build_router(state, &config.cors_allowed_origin);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TribunaError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| TribunaError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
