//! Wire message envelope and reserved close codes.
//!
//! Every message on a realtime channel, in both directions, is a JSON object
//! with a required `type` discriminator string plus arbitrary additional
//! fields. [`Envelope`] captures that shape without constraining the extra
//! fields, so callers can layer their own protocols on top.
//!
//! The reserved strings and close codes are part of the server contract;
//! do not change them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved message type for heartbeat pings.
pub const PING_TYPE: &str = "ping";

/// Normal closure, sent on intentional disconnect.
pub const CLOSE_NORMAL: u16 = 1000;
/// Reserved close code: the server rejected the credential (unauthorized).
pub const CLOSE_UNAUTHORIZED: u16 = 4401;
/// Reserved close code: the credential is valid but lacks access (forbidden).
pub const CLOSE_FORBIDDEN: u16 = 4403;

/// Whether a close code signals a non-retryable auth rejection.
///
/// Credential-based rejection will not self-heal, so the reconnect policy
/// must not schedule a retry for these codes.
pub fn is_auth_rejection(code: u16) -> bool {
    code == CLOSE_UNAUTHORIZED || code == CLOSE_FORBIDDEN
}

/// A channel message: `type` discriminator plus arbitrary extra fields.
///
/// ```json
/// { "type": "org.updated", "orgId": "org_123", "actor": "usr_9" }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub message_type: String,
    /// All remaining fields, shape varies by message type.
    #[serde(flatten)]
    pub data: serde_json::Map<String, Value>,
}

impl Envelope {
    /// Create an envelope with the given type and no extra fields.
    pub fn new(message_type: impl Into<String>) -> Self {
        Self {
            message_type: message_type.into(),
            data: serde_json::Map::new(),
        }
    }

    /// Create the reserved heartbeat message carrying a client timestamp.
    pub fn ping(timestamp_ms: u64) -> Self {
        let mut data = serde_json::Map::new();
        let _ = data.insert("timestamp".to_string(), Value::from(timestamp_ms));
        Self {
            message_type: PING_TYPE.to_string(),
            data,
        }
    }

    /// Whether this is the reserved heartbeat message.
    pub fn is_ping(&self) -> bool {
        self.message_type == PING_TYPE
    }

    /// Get an extra field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Envelope serde ───────────────────────────────────────────────

    #[test]
    fn serializes_type_field() {
        let env = Envelope::new("org.updated");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["type"], "org.updated");
    }

    #[test]
    fn extra_fields_flattened() {
        let mut env = Envelope::new("audit.entry");
        let _ = env
            .data
            .insert("orgId".to_string(), Value::from("org_123"));
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["orgId"], "org_123");
        assert!(json.get("data").is_none(), "extra fields must be top-level");
    }

    #[test]
    fn deserializes_arbitrary_fields() {
        let env: Envelope =
            serde_json::from_str(r#"{"type":"team.created","teamId":"t_1","count":3}"#).unwrap();
        assert_eq!(env.message_type, "team.created");
        assert_eq!(env.field("teamId").unwrap(), "t_1");
        assert_eq!(env.field("count").unwrap(), 3);
    }

    #[test]
    fn missing_type_is_an_error() {
        let result = serde_json::from_str::<Envelope>(r#"{"teamId":"t_1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn roundtrip_preserves_fields() {
        let original: Envelope =
            serde_json::from_str(r#"{"type":"x","a":1,"b":"two","c":{"nested":true}}"#).unwrap();
        let json = serde_json::to_string(&original).unwrap();
        let back: Envelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    // ── Ping ─────────────────────────────────────────────────────────

    #[test]
    fn ping_wire_shape() {
        let env = Envelope::ping(1_700_000_000_000);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["type"], "ping");
        assert_eq!(json["timestamp"], 1_700_000_000_000_u64);
    }

    #[test]
    fn ping_is_ping() {
        assert!(Envelope::ping(0).is_ping());
        assert!(!Envelope::new("pong").is_ping());
    }

    // ── Close codes ──────────────────────────────────────────────────

    #[test]
    fn auth_rejection_codes() {
        assert!(is_auth_rejection(CLOSE_UNAUTHORIZED));
        assert!(is_auth_rejection(CLOSE_FORBIDDEN));
    }

    #[test]
    fn other_codes_are_retryable() {
        assert!(!is_auth_rejection(CLOSE_NORMAL));
        assert!(!is_auth_rejection(1006));
        assert!(!is_auth_rejection(4400));
        assert!(!is_auth_rejection(4404));
    }
}
