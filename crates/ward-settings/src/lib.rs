//! # ward-settings
//!
//! Layered configuration for the ward client SDK.
//!
//! Loading flow:
//! 1. Start with compiled [`WardSettings::default()`]
//! 2. If `~/.ward/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `WARD_*` environment variable overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{load_settings, load_settings_from_path, settings_path};
pub use types::{IdentitySettings, RealtimeSettings, WardSettings};
