// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tribuna serve` command implementation.
//!
//! Wires the gateway together: SQLite audit ledger, identity service
//! client, upstream search client, per-tenant quota tracker, and the
//! axum server. Supports graceful shutdown via signal handlers.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tribuna_config::TribunaConfig;
use tribuna_core::TribunaError;
use tribuna_datajud::DatajudClient;
use tribuna_gateway::{AuditRecorder, GatewayState, ServerConfig, TenantResolver, start_server};
use tribuna_identity::HttpIdentityProvider;
use tribuna_quota::QuotaTracker;
use tribuna_resilience::RetryPolicy;
use tribuna_storage::{AuditLedger, Database};

/// Runs the `tribuna serve` command.
///
/// Initializes every component from the loaded configuration, starts the
/// HTTP server, and blocks until a shutdown signal arrives. In-flight
/// requests are drained before the database is closed.
pub async fn run(config: TribunaConfig) -> Result<(), TribunaError> {
    init_tracing(&config.gateway.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "starting tribuna serve");

    // Identity service client. Callers cannot be resolved without one, so
    // a missing base URL refuses to serve rather than failing every request.
    let identity_base = config.identity.base_url.as_deref().ok_or_else(|| {
        TribunaError::Config(
            "identity.base_url is not set; the gateway cannot verify callers without it"
                .to_string(),
        )
    })?;
    let service_key = config.identity.service_key.as_deref().unwrap_or_default();
    if service_key.is_empty() {
        warn!("identity.service_key is not set; membership lookups may be rejected");
    }
    let identity = Arc::new(HttpIdentityProvider::new(identity_base, service_key)?);
    let resolver = TenantResolver::new(identity.clone(), identity);
    info!(base_url = identity_base, "identity service client initialized");

    // Audit storage. Opening runs migrations, so a bad path fails here
    // instead of on the first search.
    let db = Database::open(&config.storage.database_path, config.storage.wal_mode).await?;
    let ledger = Arc::new(AuditLedger::new(db.clone()));
    let audit = AuditRecorder::new(ledger);
    info!(
        path = config.storage.database_path.as_str(),
        wal_mode = config.storage.wal_mode,
        "audit ledger ready"
    );

    // Upstream search client. A missing API key is not fatal at startup;
    // each search fails with a configuration error until one is set.
    let datajud = match config.datajud.api_key.as_deref() {
        Some(key) => {
            let client = DatajudClient::new(
                key,
                &config.datajud.base_url,
                Duration::from_secs(config.datajud.timeout_secs),
            )?;
            info!(
                base_url = config.datajud.base_url.as_str(),
                "upstream search client initialized"
            );
            Some(Arc::new(client))
        }
        None => {
            warn!(
                "datajud.api_key is not set; searches will fail until one is configured \
                 (usually via TRIBUNA_DATAJUD_API_KEY)"
            );
            None
        }
    };

    let state = GatewayState {
        quota: Arc::new(QuotaTracker::new()),
        quota_limit: config.quota.limit,
        quota_window: Duration::from_secs(config.quota.window_secs),
        retry: RetryPolicy::new(
            config.retry.max_attempts,
            Duration::from_millis(config.retry.base_delay_ms),
            Duration::from_millis(config.retry.max_delay_ms),
        ),
        retryable_statuses: config.retry.retryable_status_codes.clone(),
        datajud,
        resolver,
        audit,
        started_at: std::time::Instant::now(),
    };
    debug!(
        quota_limit = config.quota.limit,
        quota_window_secs = config.quota.window_secs,
        max_attempts = config.retry.max_attempts,
        "gateway state assembled"
    );

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
        cors_allowed_origin: config.gateway.cors_allowed_origin.clone(),
    };

    // Install signal handlers for graceful shutdown.
    let cancel = install_signal_handler();

    start_server(&server_config, state, cancel).await?;

    // Flush the WAL so the audit trail is complete on disk before exit.
    db.close().await?;

    info!("tribuna serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for the serve command.
///
/// Respects `RUST_LOG` if set; otherwise derives a filter from the
/// configured log level, scoped to this workspace's crates.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tribuna={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is
/// received. The handler task runs in the background until then.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(stream) => stream,
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler, using Ctrl+C only");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                    token_clone.cancel();
                    return;
                }
            };

            tokio::select! {
                _ = ctrl_c => {
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}
