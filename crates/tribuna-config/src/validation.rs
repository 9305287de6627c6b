// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, positive retry attempts, and
//! well-formed status-code lists.

use crate::diagnostic::ConfigError;
use crate::model::TribunaConfig;

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TribunaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate gateway.host is not empty and looks like an IP or hostname
    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.gateway.port == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.port must not be 0".to_string(),
        });
    }

    // CORS origin is either the wildcard or a scheme://host[:port] origin
    let origin = config.gateway.cors_allowed_origin.trim();
    if origin != "*" && !origin.starts_with("http://") && !origin.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!(
                "gateway.cors_allowed_origin must be `*` or an http(s) origin, got `{origin}`"
            ),
        });
    }

    if !VALID_LOG_LEVELS.contains(&config.gateway.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "gateway.log_level must be one of {}, got `{}`",
                VALID_LOG_LEVELS.join(", "),
                config.gateway.log_level
            ),
        });
    }

    if !config.datajud.base_url.starts_with("http://")
        && !config.datajud.base_url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "datajud.base_url must start with http:// or https://, got `{}`",
                config.datajud.base_url
            ),
        });
    }

    if config.datajud.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "datajud.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.retry.max_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "retry.max_attempts must be at least 1".to_string(),
        });
    }

    if config.retry.base_delay_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "retry.base_delay_ms must be at least 1".to_string(),
        });
    }

    if config.retry.max_delay_ms < config.retry.base_delay_ms {
        errors.push(ConfigError::Validation {
            message: format!(
                "retry.max_delay_ms ({}) must not be below retry.base_delay_ms ({})",
                config.retry.max_delay_ms, config.retry.base_delay_ms
            ),
        });
    }

    for &code in &config.retry.retryable_status_codes {
        if !(100..=599).contains(&code) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "retry.retryable_status_codes contains `{code}`, not a valid HTTP status"
                ),
            });
        }
    }

    if config.quota.limit == 0 {
        errors.push(ConfigError::Validation {
            message: "quota.limit must be at least 1".to_string(),
        });
    }

    if config.quota.window_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "quota.window_secs must be at least 1".to_string(),
        });
    }

    if let Some(base_url) = &config.identity.base_url
        && !base_url.starts_with("http://")
        && !base_url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "identity.base_url must start with http:// or https://, got `{base_url}`"
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
