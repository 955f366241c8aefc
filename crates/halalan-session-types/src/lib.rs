//! Session-token types shared by the auth service and its callers.
//!
//! Provides the canonical session cookie, the legacy cookie-name
//! compatibility adapter, and the trusted identity header name.

pub mod cookie;

/// Header carrying a pre-resolved user id, injected by privileged internal
/// callers. Requests bearing it skip the session-token lookup entirely.
pub const X_USER_ID: &str = "x-user-id";
