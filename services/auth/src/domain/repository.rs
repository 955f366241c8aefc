#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{OneTimeCode, PendingRegistration, Session, User};
use crate::error::AuthServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError>;

    /// Insert a new user. A unique-constraint hit on `email` is reported
    /// as [`AuthServiceError::DuplicateEmail`], never as an internal error.
    async fn create(&self, user: &User) -> Result<(), AuthServiceError>;

    /// Stamp `last_login_at`.
    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AuthServiceError>;

    /// Stamp `last_login_at` and refresh the avatar image on OAuth re-login.
    async fn record_oauth_login(
        &self,
        id: Uuid,
        image: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError>;

    /// Hard-delete the account. Sessions go with it (FK cascade).
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, AuthServiceError>;
}

/// Repository for one-time codes.
pub trait OtpRepository: Send + Sync {
    /// Delete any code rows for the email and insert the replacement, in
    /// one transaction, so two valid codes never coexist.
    async fn replace_for_email(&self, code: &OneTimeCode) -> Result<(), AuthServiceError>;

    /// Exact email + code match, regardless of expiry (the ledger decides
    /// what an expired match means).
    async fn find_by_email_and_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<OneTimeCode>, AuthServiceError>;

    async fn delete(&self, id: Uuid) -> Result<(), AuthServiceError>;

    /// Delete all rows past expiry. Returns the number removed.
    async fn delete_expired(&self) -> Result<u64, AuthServiceError>;
}

/// Repository for sessions.
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), AuthServiceError>;

    /// Find a session by token where `expires_at` is still in the future.
    async fn find_valid_by_token(
        &self,
        token: &str,
    ) -> Result<Option<Session>, AuthServiceError>;

    /// Revoke a session. Returns `true` if a row was deleted.
    async fn delete_by_token(&self, token: &str) -> Result<bool, AuthServiceError>;
}

/// TTL'd cache for registration state (Redis): rate-limit counters and the
/// pending name+password payload. Injected into the flows rather than
/// reached as ambient state.
pub trait RegistrationCache: Send + Sync {
    /// OTP sends recorded for this email inside the rolling window.
    async fn attempts(&self, email: &str) -> Result<u32, AuthServiceError>;

    async fn last_sent_at(&self, email: &str)
    -> Result<Option<DateTime<Utc>>, AuthServiceError>;

    /// Store the new attempt count and last-sent stamp, both with the
    /// 24-hour window TTL.
    async fn record_send(
        &self,
        email: &str,
        attempts: u32,
        at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError>;

    /// Forget both rate-limit keys (successful verification).
    async fn clear_rate_limit(&self, email: &str) -> Result<(), AuthServiceError>;

    /// Store the pending registration payload with the OTP lifetime TTL.
    async fn put_pending(
        &self,
        email: &str,
        pending: &PendingRegistration,
    ) -> Result<(), AuthServiceError>;

    /// Read and delete the pending payload in one step.
    async fn take_pending(
        &self,
        email: &str,
    ) -> Result<Option<PendingRegistration>, AuthServiceError>;
}

/// Outbound mail port.
pub trait Mailer: Send + Sync {
    /// Whether a relay is configured at all. Unconfigured mail is a
    /// distinct, expected state (development environments).
    fn is_configured(&self) -> bool;

    async fn send_otp(&self, to: &str, code: &str) -> anyhow::Result<()>;
}
