use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an account proves its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Credentials,
    Google,
}

impl AuthProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credentials => "credentials",
            Self::Google => "google",
        }
    }

    /// Parse the stored provider tag. Unknown tags are treated as
    /// `Credentials` (legacy rows predate the tag).
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "google" => Self::Google,
            _ => Self::Credentials,
        }
    }
}

/// User account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// None for OAuth-only accounts.
    pub password_hash: Option<String>,
    pub provider: AuthProvider,
    pub provider_id: Option<String>,
    pub image: Option<String>,
    pub is_admin: bool,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One-time registration code bound to an email address.
#[derive(Debug, Clone)]
pub struct OneTimeCode {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OneTimeCode {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Submitted registration data held in cache between OTP issuance and
/// verification. Same lifetime as the code itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub name: String,
    pub password: String,
}

/// Opaque session token bound to a user, with absolute expiry.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// One-time code lifetime in seconds (5 minutes).
pub const OTP_TTL_SECS: i64 = 300;

/// One-time code length in digits.
pub const OTP_LEN: usize = 6;

/// Rate-limit bookkeeping window in seconds (24 hours).
pub const OTP_RATE_WINDOW_SECS: i64 = 86_400;

/// Cooldown between sends for the first few attempts (1 minute).
pub const OTP_BASE_COOLDOWN_SECS: i64 = 60;

/// Cooldown once an email has accumulated enough attempts (3 minutes).
pub const OTP_EXTENDED_COOLDOWN_SECS: i64 = 180;

/// Attempt count at which the extended cooldown kicks in.
pub const OTP_EXTENDED_AFTER_ATTEMPTS: u32 = 3;

/// Session lifetime in seconds (30 days), fixed at login.
pub const SESSION_TTL_SECS: i64 = 2_592_000;

/// Opaque session token length in characters.
pub const SESSION_TOKEN_LEN: usize = 64;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Maximum accepted email length.
pub const MAX_EMAIL_LEN: usize = 255;

/// Shallow shape check for email addresses. Deliverability is proven by
/// the OTP round-trip, not here.
pub fn validate_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
}
