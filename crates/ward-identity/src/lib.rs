//! # ward-identity
//!
//! Identity/claims resolution for the admin console client:
//!
//! - [`parse_user`]: deterministic, side-effect-free normalization of an
//!   identity-provider profile into a [`NormalizedUser`]. Total over
//!   malformed or partial input — every missing or mistyped field degrades
//!   to a safe default (empty string or empty list), never an error
//! - [`has_role`] / [`has_any_role`] / [`has_all_roles`]: pure authorization
//!   predicates over the union of realm and client roles
//!
//! The resolver runs once per authentication event; its output feeds route
//! guards and the realtime channel lifecycle.

#![deny(unsafe_code)]

pub mod claims;
pub mod roles;
pub mod user;

pub use claims::parse_user;
pub use roles::{has_all_roles, has_any_role, has_role};
pub use user::NormalizedUser;
