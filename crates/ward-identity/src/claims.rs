//! Profile-to-user normalization.
//!
//! [`parse_user`] is total: any JSON value is accepted, and every missing or
//! mistyped claim degrades to a safe default. Client-role resolution is an
//! ordered list of extractors tried in sequence — the first claim that is
//! present with a usable shape wins, with no merging across sources.

use serde_json::Value;

use crate::user::NormalizedUser;

/// Read a string claim, treating non-string values as absent.
fn string_claim(profile: &Value, key: &str) -> Option<String> {
    profile.get(key)?.as_str().map(String::from)
}

/// Interpret a claim value as a list of strings.
///
/// Returns `None` when the value is not an array. Non-string elements inside
/// an array are skipped rather than failing the whole claim.
fn string_list(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
    )
}

/// Platform-wide roles from the `realm_access.roles` claim.
fn realm_roles_claim(profile: &Value) -> Option<Vec<String>> {
    string_list(profile.get("realm_access")?.get("roles")?)
}

/// Application roles from a direct top-level `roles` claim.
fn direct_roles_claim(profile: &Value) -> Option<Vec<String>> {
    string_list(profile.get("roles")?)
}

/// Application roles from the nested `resource_access.<client>.roles` claim.
fn resource_roles_claim(profile: &Value, client_id: &str) -> Option<Vec<String>> {
    string_list(profile.get("resource_access")?.get(client_id)?.get("roles")?)
}

/// Normalize an identity-provider profile into a [`NormalizedUser`].
///
/// `client_id` is this application's client registration, used for the
/// `resource_access.<client_id>.roles` lookup.
///
/// Field resolution:
/// - `subject` ← `sub`, `email` ← `email`: empty string when absent
/// - `display_name` ← `name`, falling back to `preferred_username`, then `""`
/// - `realm_roles` ← `realm_access.roles`: empty when absent
/// - `client_roles` ← first present of `roles`, then
///   `resource_access.<client_id>.roles`: empty when neither is present
/// - `organization_id` ← `org_id`, `team_ids` ← `team_ids`: passed through
///
/// Never panics, regardless of the profile's shape.
pub fn parse_user(profile: &Value, client_id: &str) -> NormalizedUser {
    let preferred_username = string_claim(profile, "preferred_username");

    let display_name = string_claim(profile, "name")
        .or_else(|| preferred_username.clone())
        .unwrap_or_default();

    // Ordered extractor chain: first non-absent source wins, no merging.
    let client_role_sources: [&dyn Fn(&Value) -> Option<Vec<String>>; 2] = [
        &direct_roles_claim,
        &|p| resource_roles_claim(p, client_id),
    ];
    let client_roles = client_role_sources
        .iter()
        .find_map(|extract| extract(profile))
        .unwrap_or_default();

    NormalizedUser {
        subject: string_claim(profile, "sub").unwrap_or_default(),
        email: string_claim(profile, "email").unwrap_or_default(),
        display_name,
        preferred_username,
        realm_roles: realm_roles_claim(profile).unwrap_or_default(),
        client_roles,
        organization_id: string_claim(profile, "org_id"),
        team_ids: profile.get("team_ids").and_then(string_list),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
