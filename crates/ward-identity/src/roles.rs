//! Authorization predicates over a normalized user's roles.
//!
//! All checks are exact, case-sensitive string matches against the union of
//! realm and client roles. An absent user (`None`) always fails.

use crate::user::NormalizedUser;

/// Whether the user's combined roles contain `role`.
fn user_has(user: &NormalizedUser, role: &str) -> bool {
    user.realm_roles.iter().any(|r| r == role) || user.client_roles.iter().any(|r| r == role)
}

/// Returns `true` iff the user is present and holds at least one of
/// `required`.
///
/// An empty `required` slice returns `false`: a query with no explicit role
/// to check is treated as "no access", not a grant.
pub fn has_role<S: AsRef<str>>(user: Option<&NormalizedUser>, required: &[S]) -> bool {
    let Some(user) = user else {
        return false;
    };
    required.iter().any(|role| user_has(user, role.as_ref()))
}

/// Alias for [`has_role`].
pub fn has_any_role<S: AsRef<str>>(user: Option<&NormalizedUser>, required: &[S]) -> bool {
    has_role(user, required)
}

/// Returns `true` iff the user is present and holds every role in `required`.
///
/// An empty `required` slice returns `true` for a present user (every one of
/// zero requirements is satisfied) but `false` for an absent user. Note the
/// asymmetry with [`has_role`], where an empty slice always returns `false`:
/// both behaviors are part of the existing route-guard contract and are
/// locked in by tests. Flagged for product-owner confirmation before being
/// treated as permanent.
pub fn has_all_roles<S: AsRef<str>>(user: Option<&NormalizedUser>, required: &[S]) -> bool {
    let Some(user) = user else {
        return false;
    };
    required.iter().all(|role| user_has(user, role.as_ref()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn user(realm: &[&str], client: &[&str]) -> NormalizedUser {
        NormalizedUser {
            realm_roles: realm.iter().map(ToString::to_string).collect(),
            client_roles: client.iter().map(ToString::to_string).collect(),
            ..NormalizedUser::default()
        }
    }

    // ── has_role ─────────────────────────────────────────────────────

    #[test]
    fn matches_realm_role() {
        let u = user(&["admin"], &[]);
        assert!(has_role(Some(&u), &["admin"]));
    }

    #[test]
    fn matches_client_role() {
        let u = user(&[], &["org-manager"]);
        assert!(has_role(Some(&u), &["org-manager"]));
    }

    #[test]
    fn matches_any_of_required() {
        let u = user(&["viewer"], &[]);
        assert!(has_role(Some(&u), &["admin", "viewer"]));
    }

    #[test]
    fn no_match_returns_false() {
        let u = user(&["viewer"], &["reporter"]);
        assert!(!has_role(Some(&u), &["admin"]));
    }

    #[test]
    fn absent_user_returns_false() {
        assert!(!has_role::<&str>(None, &["admin"]));
    }

    #[test]
    fn empty_required_returns_false() {
        let u = user(&["admin"], &["org-manager"]);
        assert!(!has_role::<&str>(Some(&u), &[]));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let u = user(&["admin"], &[]);
        assert!(!has_role(Some(&u), &["ADMIN"]));
        assert!(!has_role(Some(&u), &["Admin"]));
    }

    #[test]
    fn no_substring_matching() {
        let u = user(&["administrator"], &[]);
        assert!(!has_role(Some(&u), &["admin"]));
    }

    // ── has_any_role ─────────────────────────────────────────────────

    #[test]
    fn any_role_is_an_alias() {
        let u = user(&["admin"], &[]);
        assert!(has_any_role(Some(&u), &["admin"]));
        assert!(!has_any_role::<&str>(Some(&u), &[]));
        assert!(!has_any_role::<&str>(None, &["admin"]));
    }

    // ── has_all_roles ────────────────────────────────────────────────

    #[test]
    fn all_roles_present_across_scopes() {
        let u = user(&["admin"], &["org-manager"]);
        assert!(has_all_roles(Some(&u), &["admin", "org-manager"]));
    }

    #[test]
    fn one_missing_fails() {
        let u = user(&["admin"], &[]);
        assert!(!has_all_roles(Some(&u), &["admin", "org-manager"]));
    }

    #[test]
    fn empty_required_is_vacuously_true_for_present_user() {
        let u = user(&[], &[]);
        assert!(has_all_roles::<&str>(Some(&u), &[]));
    }

    #[test]
    fn empty_required_is_false_for_absent_user() {
        assert!(!has_all_roles::<&str>(None, &[]));
    }

    #[test]
    fn absent_user_fails_regardless_of_required() {
        assert!(!has_all_roles::<&str>(None, &["admin"]));
    }

    #[test]
    fn all_roles_case_sensitive() {
        let u = user(&["admin"], &[]);
        assert!(!has_all_roles(Some(&u), &["ADMIN"]));
    }

    // ── The documented quirk, side by side ───────────────────────────

    #[test]
    fn empty_required_asymmetry_locked_in() {
        let u = user(&["admin"], &[]);
        assert!(!has_role::<&str>(Some(&u), &[]));
        assert!(has_all_roles::<&str>(Some(&u), &[]));
        assert!(!has_role::<&str>(None, &[]));
        assert!(!has_all_roles::<&str>(None, &[]));
    }

    #[test]
    fn duplicate_required_roles_are_harmless() {
        let u = user(&["admin"], &[]);
        assert!(has_all_roles(Some(&u), &["admin", "admin"]));
        assert!(has_role(Some(&u), &["admin", "admin"]));
    }
}
