//! Settings type definitions.
//!
//! Field names serialize in camelCase to match the console's settings file
//! format; every field carries a serde default so partial files merge
//! cleanly.

use serde::{Deserialize, Serialize};

/// Default base reconnect interval in milliseconds.
pub const DEFAULT_RECONNECT_BASE_MS: u64 = 3000;
/// Default maximum reconnect attempts before giving up.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 10;
/// Default heartbeat interval in milliseconds.
pub const DEFAULT_HEARTBEAT_INTERVAL_MS: u64 = 30_000;
/// Default client registration used for `resource_access` role lookup.
pub const DEFAULT_CLIENT_ID: &str = "admin-console";

/// Top-level settings for the ward client SDK.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardSettings {
    /// Realtime channel settings.
    #[serde(default)]
    pub realtime: RealtimeSettings,
    /// Identity/claims settings.
    #[serde(default)]
    pub identity: IdentitySettings,
}

/// Realtime channel settings.
///
/// The reconnect ceiling (30 s) is fixed by the backoff policy and is not
/// configurable here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeSettings {
    /// Base reconnect interval in ms (default: 3000).
    #[serde(default = "default_reconnect_base_ms")]
    pub reconnect_base_ms: u64,
    /// Maximum reconnect attempts before giving up (default: 10).
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
    /// Heartbeat interval in ms (default: 30000).
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,
}

fn default_reconnect_base_ms() -> u64 {
    DEFAULT_RECONNECT_BASE_MS
}
fn default_max_reconnect_attempts() -> u32 {
    DEFAULT_MAX_RECONNECT_ATTEMPTS
}
fn default_heartbeat_interval_ms() -> u64 {
    DEFAULT_HEARTBEAT_INTERVAL_MS
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        Self {
            reconnect_base_ms: DEFAULT_RECONNECT_BASE_MS,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            heartbeat_interval_ms: DEFAULT_HEARTBEAT_INTERVAL_MS,
        }
    }
}

/// Identity/claims settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySettings {
    /// This application's client registration with the identity provider,
    /// used for the `resource_access.<clientId>.roles` lookup.
    #[serde(default = "default_client_id")]
    pub client_id: String,
}

fn default_client_id() -> String {
    DEFAULT_CLIENT_ID.to_string()
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            client_id: default_client_id(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
