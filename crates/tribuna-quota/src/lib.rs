// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-tenant search quota with fixed windows.
//!
//! The tracker keeps one `{count, reset_at}` record per tenant in a
//! [`DashMap`] and admits or denies each search before the upstream is
//! contacted. A fixed window is imprecise at its boundary: a tenant can burst
//! up to twice the limit across a window edge. That is accepted here - the
//! quota damps abuse, it is not billing - and the [`QuotaTracker::allow`]
//! contract hides the algorithm so a sliding window can replace it without
//! touching call sites.
//!
//! State lives in process memory only. A restart forgets all windows, which
//! errs in the tenant's favor.
//!
//! Time comes from [`tokio::time::Instant`] so tests drive window expiry with
//! a paused clock instead of real waiting.

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::{debug, warn};

/// One tenant's live window.
#[derive(Debug, Clone, Copy)]
struct QuotaWindow {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window quota tracker, one instance per process.
///
/// Owned by the gateway state and injected wherever admission is decided;
/// there is no global. Construction is cheap and tests create a fresh one
/// each.
#[derive(Debug, Default)]
pub struct QuotaTracker {
    windows: DashMap<String, QuotaWindow>,
}

impl QuotaTracker {
    pub fn new() -> Self {
        Self {
            windows: DashMap::new(),
        }
    }

    /// Admits or denies one search for `tenant_key`.
    ///
    /// Admission increments the tenant's count; denial leaves it untouched.
    /// An expired window (now at or past `reset_at`) is reset to zero before
    /// counting, so the first call of a new window always succeeds.
    ///
    /// The whole read-modify-write runs under the map's entry lock for the
    /// tenant key: two racing requests can never both take the last slot.
    pub fn allow(&self, tenant_key: &str, limit: u32, window: Duration) -> bool {
        let now = Instant::now();
        let mut entry = self
            .windows
            .entry(tenant_key.to_string())
            .or_insert_with(|| QuotaWindow {
                count: 0,
                reset_at: now + window,
            });

        if now >= entry.reset_at {
            entry.count = 0;
            entry.reset_at = now + window;
            debug!(tenant = tenant_key, "quota window reset");
        }

        if entry.count >= limit {
            warn!(
                tenant = tenant_key,
                count = entry.count,
                limit,
                "search quota exhausted"
            );
            return false;
        }

        entry.count += 1;
        true
    }

    /// The tenant's count as of its last [`allow`](Self::allow) call.
    ///
    /// Reading does not reset an expired window; `None` means the tenant has
    /// never been seen.
    pub fn current_count(&self, tenant_key: &str) -> Option<u32> {
        self.windows.get(tenant_key).map(|w| w.count)
    }
}
