//! # ward-core
//!
//! Shared vocabulary for the ward client SDK:
//!
//! - **Wire envelope**: [`Envelope`], the `type`-discriminated JSON message
//!   shape exchanged over realtime channels, including the reserved `"ping"`
//!   heartbeat message
//! - **Close codes**: the reserved close codes the server uses to signal
//!   non-retryable auth rejection
//! - **Clock**: [`now_ms`], millis since the Unix epoch

#![deny(unsafe_code)]

pub mod time;
pub mod wire;

pub use time::now_ms;
pub use wire::{
    CLOSE_FORBIDDEN, CLOSE_NORMAL, CLOSE_UNAUTHORIZED, Envelope, PING_TYPE, is_auth_rejection,
};
