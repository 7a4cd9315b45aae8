//! Transport error types.

use thiserror::Error;

/// Errors raised at the transport seam.
///
/// None of these are fatal to the channel: the driver degrades them to
/// status transitions and the retry policy.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The channel URL could not be parsed.
    #[error("invalid channel url: {0}")]
    Url(#[from] url::ParseError),
    /// The underlying WebSocket failed.
    #[error("websocket failure: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    /// The transport is no longer writable.
    #[error("transport closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_error_display() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err = TransportError::from(parse_err);
        assert!(err.to_string().contains("invalid channel url"));
    }

    #[test]
    fn closed_display() {
        assert_eq!(TransportError::Closed.to_string(), "transport closed");
    }
}
