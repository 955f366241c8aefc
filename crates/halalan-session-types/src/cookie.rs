//! Session cookie builders and the legacy cookie-name adapter.
//!
//! The canonical cookie is `session_token`. The previous front-end stack
//! issued the same opaque token under four NextAuth cookie names (plain,
//! `__Secure-`/`__Host-` prefixed, and an underscore misspelling); those
//! are honored read-side only, never written.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Canonical cookie name for the session token.
pub const SESSION_TOKEN: &str = "session_token";

/// Legacy cookie names still accepted on inbound requests, checked in
/// the order the previous stack resolved them.
pub const LEGACY_SESSION_TOKENS: &[&str] = &[
    "next-auth.session-token",
    "__Secure-next-auth.session-token",
    "next-auth_session-token",
    "__Host-next-auth.session-token",
];

/// Session cookie Max-Age in seconds (30 days, the session row lifetime).
pub const SESSION_COOKIE_MAX_AGE: i64 = 2_592_000;

/// Extract the session token from a jar: canonical name first, then the
/// legacy names in order.
///
/// ```
/// use axum_extra::extract::cookie::{Cookie, CookieJar};
/// use halalan_session_types::cookie::session_token_from_jar;
///
/// let jar = CookieJar::new().add(Cookie::new("next-auth.session-token", "abc"));
/// assert_eq!(session_token_from_jar(&jar), Some("abc".to_string()));
///
/// let jar = jar.add(Cookie::new("session_token", "xyz"));
/// assert_eq!(session_token_from_jar(&jar), Some("xyz".to_string()));
/// ```
pub fn session_token_from_jar(jar: &CookieJar) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_TOKEN) {
        return Some(cookie.value().to_owned());
    }
    LEGACY_SESSION_TOKENS
        .iter()
        .find_map(|name| jar.get(name).map(|c| c.value().to_owned()))
}

/// Set the canonical session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use halalan_session_types::cookie::{set_session_cookie, SESSION_TOKEN};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "token_value".to_string(), "example.ph".to_string());
/// let cookie = jar.get(SESSION_TOKEN).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.ph"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(2_592_000)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String, domain: String) -> CookieJar {
    let cookie = Cookie::build((SESSION_TOKEN, value))
        .path("/")
        .domain(domain)
        .max_age(Duration::seconds(SESSION_COOKIE_MAX_AGE))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Clear the canonical session cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use halalan_session_types::cookie::{clear_session_cookie, set_session_cookie, SESSION_TOKEN};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "t".to_string(), "example.ph".to_string());
/// let jar = clear_session_cookie(jar, "example.ph".to_string());
/// let cookie = jar.get(SESSION_TOKEN).unwrap();
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, domain: String) -> CookieJar {
    let cookie = Cookie::build((SESSION_TOKEN, ""))
        .path("/")
        .domain(domain)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}
