//! Transport seam: `Connector`/`Transport` traits and the
//! tokio-tungstenite implementation.
//!
//! The driver task only talks to these traits, so tests can script a
//! transport without a socket. Each open produces a fresh, exclusively
//! owned handle — handles are never reused across reconnects.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};
use url::Url;

use crate::errors::TransportError;

/// Build the channel URL with the bearer credential appended as a `token`
/// query parameter.
///
/// The credential is URL-encoded, and the `?`/`&` separator is chosen
/// correctly for base URLs that already carry a query string.
pub fn build_channel_url(base: &str, credential: &str) -> Result<Url, TransportError> {
    let mut url = Url::parse(base)?;
    let _ = url.query_pairs_mut().append_pair("token", credential);
    Ok(url)
}

/// An event read from the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    /// A text frame arrived.
    Text(String),
    /// The transport closed; `code` carries the close code if one was
    /// received (errors and abrupt stream ends report `None`).
    Closed {
        /// Close code from the close frame, if any.
        code: Option<u16>,
    },
}

/// One open transport handle, exclusively owned by its channel.
#[async_trait]
pub trait Transport: Send {
    /// Send a text frame.
    async fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    /// Wait for the next transport event. After returning
    /// [`TransportEvent::Closed`] the handle must be discarded.
    async fn next_event(&mut self) -> TransportEvent;

    /// Close the transport with the given close code. Best effort; errors
    /// are logged and swallowed.
    async fn close(&mut self, code: u16);
}

/// Factory for transport handles.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a new transport against `url`.
    async fn open(&self, url: &Url) -> Result<Box<dyn Transport>, TransportError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// tokio-tungstenite implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Connector backed by tokio-tungstenite.
#[derive(Clone, Copy, Debug, Default)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn open(&self, url: &Url) -> Result<Box<dyn Transport>, TransportError> {
        let (stream, _response) = connect_async(url.as_str()).await?;
        Ok(Box::new(WsTransport { stream }))
    }
}

/// WebSocket transport over a plain or TLS TCP stream.
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Transport for WsTransport {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    async fn next_event(&mut self) -> TransportEvent {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return TransportEvent::Text(text.to_string()),
                Some(Ok(Message::Close(frame))) => {
                    return TransportEvent::Closed {
                        code: frame.map(|f| u16::from(f.code)),
                    };
                }
                // Ping/pong are handled by the protocol layer; binary
                // frames are not part of the channel wire format.
                Some(Ok(other)) => {
                    debug!(frame = ?other, "ignoring non-text frame");
                }
                Some(Err(e)) => {
                    warn!(error = %e, "transport read failed");
                    return TransportEvent::Closed { code: None };
                }
                None => return TransportEvent::Closed { code: None },
            }
        }
    }

    async fn close(&mut self, code: u16) {
        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: "".into(),
        };
        if let Err(e) = self.stream.close(Some(frame)).await {
            debug!(error = %e, "transport close failed");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
