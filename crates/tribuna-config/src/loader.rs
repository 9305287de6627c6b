// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tribuna.toml` > `~/.config/tribuna/tribuna.toml`
//! > `/etc/tribuna/tribuna.toml` with environment variable overrides via the
//! `TRIBUNA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TribunaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tribuna/tribuna.toml` (system-wide)
/// 3. `~/.config/tribuna/tribuna.toml` (user XDG config)
/// 4. `./tribuna.toml` (local directory)
/// 5. `TRIBUNA_*` environment variables
pub fn load_config() -> Result<TribunaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TribunaConfig::default()))
        .merge(Toml::file("/etc/tribuna/tribuna.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tribuna/tribuna.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tribuna.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TribunaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TribunaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TribunaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TribunaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `TRIBUNA_DATAJUD_API_KEY` must map to
/// `datajud.api_key`, not `datajud.api.key`.
fn env_provider() -> Env {
    Env::prefixed("TRIBUNA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: TRIBUNA_QUOTA_WINDOW_SECS -> "quota_window_secs"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("gateway_", "gateway.", 1)
            .replacen("datajud_", "datajud.", 1)
            .replacen("retry_", "retry.", 1)
            .replacen("quota_", "quota.", 1)
            .replacen("identity_", "identity.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
