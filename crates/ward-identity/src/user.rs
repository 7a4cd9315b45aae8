//! Normalized user record.

use serde::{Deserialize, Serialize};

/// An identity-provider profile normalized for downstream consumption.
///
/// String fields default to the empty string rather than being omitted, and
/// the role lists are always present (possibly empty), so callers never need
/// defensive null checks. Serializes with the camelCase field names the
/// console's TypeScript code expects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedUser {
    /// Opaque stable identifier (`sub` claim); empty if absent upstream.
    #[serde(default)]
    pub subject: String,
    /// Email address; empty if absent.
    #[serde(default)]
    pub email: String,
    /// Display name, falling back to the preferred username, then empty.
    #[serde(default)]
    pub display_name: String,
    /// The `preferred_username` claim, passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    /// Platform-wide roles. Always present, possibly empty.
    #[serde(default)]
    pub realm_roles: Vec<String>,
    /// Roles scoped to this application. Always present, possibly empty.
    #[serde(default)]
    pub client_roles: Vec<String>,
    /// The `org_id` claim, passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// The `team_ids` claim, passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_ids: Option<Vec<String>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fully_defined() {
        let user = NormalizedUser::default();
        assert_eq!(user.subject, "");
        assert_eq!(user.email, "");
        assert_eq!(user.display_name, "");
        assert!(user.preferred_username.is_none());
        assert!(user.realm_roles.is_empty());
        assert!(user.client_roles.is_empty());
        assert!(user.organization_id.is_none());
        assert!(user.team_ids.is_none());
    }

    #[test]
    fn serializes_camel_case() {
        let user = NormalizedUser {
            subject: "usr_1".into(),
            display_name: "Ada".into(),
            realm_roles: vec!["admin".into()],
            ..NormalizedUser::default()
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["subject"], "usr_1");
        assert_eq!(json["displayName"], "Ada");
        assert_eq!(json["realmRoles"][0], "admin");
        assert!(json.get("display_name").is_none());
    }

    #[test]
    fn optional_fields_omitted_when_none() {
        let json = serde_json::to_value(NormalizedUser::default()).unwrap();
        assert!(json.get("preferredUsername").is_none());
        assert!(json.get("organizationId").is_none());
        assert!(json.get("teamIds").is_none());
    }

    #[test]
    fn deserializes_partial_object() {
        let user: NormalizedUser = serde_json::from_str(r#"{"subject":"usr_2"}"#).unwrap();
        assert_eq!(user.subject, "usr_2");
        assert!(user.realm_roles.is_empty());
        assert!(user.client_roles.is_empty());
    }

    #[test]
    fn roundtrip() {
        let user = NormalizedUser {
            subject: "usr_3".into(),
            email: "a@b.c".into(),
            display_name: "A B".into(),
            preferred_username: Some("ab".into()),
            realm_roles: vec!["admin".into(), "auditor".into()],
            client_roles: vec!["org-manager".into()],
            organization_id: Some("org_9".into()),
            team_ids: Some(vec!["t_1".into(), "t_2".into()]),
        };
        let json = serde_json::to_string(&user).unwrap();
        let back: NormalizedUser = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }
}
