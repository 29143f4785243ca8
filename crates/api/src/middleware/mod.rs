//! Request middleware and authorization guards.

pub mod auth;

pub use auth::{AuthUser, auth_middleware, ensure_owner_or_staff, require_customer, require_staff};
