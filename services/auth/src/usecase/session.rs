use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::types::{SESSION_TOKEN_LEN, SESSION_TTL_SECS, Session, User, validate_email};
use crate::error::{AuthServiceError, FieldError};
use crate::usecase::password::verify_password;

/// Charset for opaque session tokens (alphanumeric).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub fn generate_session_token() -> String {
    let mut rng = rand::rng();
    (0..SESSION_TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Insert a fresh session for the user. Expiry is absolute, fixed at
/// login; the middleware never slides it.
pub async fn issue_session<S: SessionRepository>(
    sessions: &S,
    user_id: Uuid,
) -> Result<Session, AuthServiceError> {
    let now = Utc::now();
    let session = Session {
        id: Uuid::now_v7(),
        token: generate_session_token(),
        user_id,
        expires_at: now + Duration::seconds(SESSION_TTL_SECS),
        created_at: now,
    };
    sessions.create(&session).await?;
    Ok(session)
}

fn validate_login(email: &str, password: &str) -> Result<(), AuthServiceError> {
    let mut errors = Vec::new();
    if !validate_email(email) {
        errors.push(FieldError::new("email", "must be a valid email address"));
    }
    if password.is_empty() {
        errors.push(FieldError::new("password", "is required"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthServiceError::Validation(errors))
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub token: String,
}

pub struct LoginUseCase<U: UserRepository, S: SessionRepository> {
    pub users: U,
    pub sessions: S,
}

impl<U: UserRepository, S: SessionRepository> LoginUseCase<U, S> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AuthServiceError> {
        validate_login(&input.email, &input.password)?;

        let mut user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        // OAuth-only accounts have no hash; tell the user which door to use.
        let stored = user
            .password_hash
            .as_deref()
            .ok_or(AuthServiceError::PasswordNotSet)?;

        if !verify_password(&input.password, stored)? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let now = Utc::now();
        self.users.record_login(user.id, now).await?;
        user.last_login_at = Some(now);

        let session = issue_session(&self.sessions, user.id).await?;
        Ok(LoginOutput {
            user,
            token: session.token,
        })
    }
}

// ── Admin login ──────────────────────────────────────────────────────────────

pub struct AdminLoginUseCase<U: UserRepository, S: SessionRepository> {
    pub users: U,
    pub sessions: S,
}

impl<U: UserRepository, S: SessionRepository> AdminLoginUseCase<U, S> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AuthServiceError> {
        validate_login(&input.email, &input.password)?;

        let mut user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !user.is_admin {
            return Err(AuthServiceError::AdminRequired);
        }

        let stored = user
            .password_hash
            .as_deref()
            .ok_or(AuthServiceError::AdminPasswordNotSet)?;

        if !verify_password(&input.password, stored)? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let now = Utc::now();
        self.users.record_login(user.id, now).await?;
        user.last_login_at = Some(now);

        let session = issue_session(&self.sessions, user.id).await?;
        Ok(LoginOutput {
            user,
            token: session.token,
        })
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> LogoutUseCase<S> {
    /// Revoke the presented session token. Requests authenticated via the
    /// trusted header carry no token; there is nothing to revoke then.
    pub async fn execute(&self, token: Option<&str>) -> Result<(), AuthServiceError> {
        if let Some(token) = token {
            self.sessions.delete_by_token(token).await?;
        }
        Ok(())
    }
}
