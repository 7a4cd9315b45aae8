//! # ward-realtime
//!
//! Reconnecting realtime channel client for the admin console.
//!
//! A [`WsClient`] owns one logical channel to a server endpoint and hides
//! transient network failures behind automatic reconnection with capped
//! exponential backoff, while leaving intentional shutdown fully under the
//! caller's control:
//!
//! - **State machine** ([`state`]): pure transitions
//!   `(state, event) -> (next state, commands)`, unit-testable without a
//!   socket; a driver task executes the commands
//! - **Backoff** ([`backoff`]): `min(base * 2^n + jitter, 30s)`, bounded
//!   attempt count
//! - **Transport seam** ([`transport`]): `Connector`/`Transport` traits with
//!   a tokio-tungstenite implementation; tests script their own
//! - **Heartbeat**: a reserved `"ping"` message on a fixed interval while
//!   connected
//!
//! Sends are at-most-once and fire-and-forget: [`WsClient::send`] reports
//! whether the message was handed to the connected channel, and nothing is
//! ever queued for later delivery.

#![deny(unsafe_code)]

pub mod backoff;
pub mod client;
pub mod errors;
pub mod state;
pub mod transport;

pub use client::WsClient;
pub use errors::TransportError;
pub use state::{ChannelEvent, ChannelState, Command, ConnectionState};
pub use transport::{Connector, Transport, TransportEvent, WsConnector, build_channel_url};
