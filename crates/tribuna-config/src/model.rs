// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Tribuna search gateway.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Tribuna configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values;
/// configuration is read once at startup and never reloaded.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TribunaConfig {
    /// HTTP listener and CORS settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Upstream judicial-records search API settings.
    #[serde(default)]
    pub datajud: DatajudConfig,

    /// Retry policy for transient upstream failures.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Per-tenant search quota settings.
    #[serde(default)]
    pub quota: QuotaConfig,

    /// Platform identity service settings.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Audit trail storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP listener and CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the server to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origin allowed by the CORS layer. `*` allows any origin.
    #[serde(default = "default_cors_allowed_origin")]
    pub cors_allowed_origin: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allowed_origin: default_cors_allowed_origin(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cors_allowed_origin() -> String {
    "*".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Upstream judicial-records search API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatajudConfig {
    /// Upstream API key. `None` leaves the gateway unable to search; each
    /// request then fails with a configuration error until one is set
    /// (usually via `TRIBUNA_DATAJUD_API_KEY`).
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the upstream search API.
    #[serde(default = "default_datajud_base_url")]
    pub base_url: String,

    /// Per-attempt request timeout in seconds.
    #[serde(default = "default_datajud_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DatajudConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_datajud_base_url(),
            timeout_secs: default_datajud_timeout_secs(),
        }
    }
}

fn default_datajud_base_url() -> String {
    "https://api-publica.datajud.cnj.jus.br".to_string()
}

fn default_datajud_timeout_secs() -> u64 {
    5
}

/// Retry policy for transient upstream failures.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts per request, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt, in milliseconds. Doubles per attempt.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound on any single delay, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Upstream HTTP statuses worth retrying. Anything else fails fast.
    #[serde(default = "default_retryable_status_codes")]
    pub retryable_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            retryable_status_codes: default_retryable_status_codes(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    8000
}

fn default_retryable_status_codes() -> Vec<u16> {
    vec![429]
}

/// Per-tenant search quota configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuotaConfig {
    /// Maximum searches per tenant per window.
    #[serde(default = "default_quota_limit")]
    pub limit: u32,

    /// Window length in seconds.
    #[serde(default = "default_quota_window_secs")]
    pub window_secs: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            limit: default_quota_limit(),
            window_secs: default_quota_window_secs(),
        }
    }
}

fn default_quota_limit() -> u32 {
    100
}

fn default_quota_window_secs() -> u64 {
    3600 // 1 hour
}

/// Platform identity service configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Base URL of the identity service. `None` disables serving entirely;
    /// the gateway refuses to start without a way to verify callers.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Service key presented to the identity service for membership lookups.
    #[serde(default)]
    pub service_key: Option<String>,
}

/// Audit trail storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("tribuna").join("tribuna.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("tribuna.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}
