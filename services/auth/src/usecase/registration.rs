use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{
    Mailer, OtpRepository, RegistrationCache, SessionRepository, UserRepository,
};
use crate::domain::types::{
    AuthProvider, MIN_PASSWORD_LEN, OTP_LEN, PendingRegistration, User, validate_email,
};
use crate::error::{AuthServiceError, FieldError};
use crate::usecase::otp::OtpLedger;
use crate::usecase::password::hash_password;
use crate::usecase::rate_limit::{RateLimiter, minutes_rounded_up};
use crate::usecase::session::issue_session;

/// Conflict for an email that is already registered, worded per the
/// provider that owns it.
fn email_conflict(provider: AuthProvider) -> AuthServiceError {
    match provider {
        AuthProvider::Google => AuthServiceError::EmailRegisteredWithGoogle,
        AuthProvider::Credentials => AuthServiceError::DuplicateEmail,
    }
}

// ── Send OTP ─────────────────────────────────────────────────────────────────

pub struct SendOtpInput {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// What happened to the dispatch attempt. Issuance itself has already
/// succeeded in every case — the code row and pending payload are stored.
#[derive(Debug)]
pub enum OtpDelivery {
    Sent,
    MailUnconfigured,
    SendFailed(String),
}

#[derive(Debug)]
pub struct SendOtpOutput {
    pub code: String,
    pub delivery: OtpDelivery,
}

pub struct SendOtpUseCase<U, O, C, M>
where
    U: UserRepository,
    O: OtpRepository,
    C: RegistrationCache,
    M: Mailer,
{
    pub users: U,
    pub ledger: OtpLedger<O, C>,
    pub rate_limiter: RateLimiter<C>,
    pub mailer: M,
}

impl<U, O, C, M> SendOtpUseCase<U, O, C, M>
where
    U: UserRepository,
    O: OtpRepository,
    C: RegistrationCache,
    M: Mailer,
{
    pub async fn execute(&self, input: SendOtpInput) -> Result<SendOtpOutput, AuthServiceError> {
        let mut errors = Vec::new();
        if !validate_email(&input.email) {
            errors.push(FieldError::new("email", "must be a valid email address"));
        }
        if input.name.trim().is_empty() {
            errors.push(FieldError::new("name", "is required"));
        }
        if input.password.len() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if !errors.is_empty() {
            return Err(AuthServiceError::Validation(errors));
        }

        if let Some(existing) = self.users.find_by_email(&input.email).await? {
            return Err(email_conflict(existing.provider));
        }

        let decision = self.rate_limiter.check_and_record(&input.email).await?;
        if !decision.allowed {
            return Err(AuthServiceError::RateLimited {
                cooldown_seconds: decision.wait_seconds,
                cooldown_minutes: minutes_rounded_up(decision.wait_seconds),
            });
        }

        let pending = PendingRegistration {
            name: input.name,
            password: input.password,
        };
        let code = self.ledger.issue(&input.email, &pending).await?;

        let delivery = if !self.mailer.is_configured() {
            tracing::warn!(email = %input.email, "mail relay not configured, otp not dispatched");
            OtpDelivery::MailUnconfigured
        } else {
            match self.mailer.send_otp(&input.email, &code).await {
                Ok(()) => {
                    tracing::info!(email = %input.email, attempt = decision.attempt_number, "otp email dispatched");
                    OtpDelivery::Sent
                }
                Err(e) => {
                    tracing::error!(email = %input.email, error = %e, "otp email dispatch failed");
                    OtpDelivery::SendFailed(e.to_string())
                }
            }
        };

        Ok(SendOtpOutput { code, delivery })
    }
}

// ── Verify OTP ───────────────────────────────────────────────────────────────

pub struct VerifyOtpInput {
    pub email: String,
    pub otp: String,
}

#[derive(Debug)]
pub struct VerifyOtpOutput {
    pub user: User,
    pub token: String,
}

pub struct VerifyOtpUseCase<U, O, C, S>
where
    U: UserRepository,
    O: OtpRepository,
    C: RegistrationCache,
    S: SessionRepository,
{
    pub users: U,
    pub ledger: OtpLedger<O, C>,
    pub rate_limiter: RateLimiter<C>,
    pub sessions: S,
}

impl<U, O, C, S> VerifyOtpUseCase<U, O, C, S>
where
    U: UserRepository,
    O: OtpRepository,
    C: RegistrationCache,
    S: SessionRepository,
{
    pub async fn execute(
        &self,
        input: VerifyOtpInput,
    ) -> Result<VerifyOtpOutput, AuthServiceError> {
        let mut errors = Vec::new();
        if !validate_email(&input.email) {
            errors.push(FieldError::new("email", "must be a valid email address"));
        }
        if input.otp.len() != OTP_LEN {
            errors.push(FieldError::new(
                "otp",
                format!("must be {OTP_LEN} characters"),
            ));
        }
        if !errors.is_empty() {
            return Err(AuthServiceError::Validation(errors));
        }

        let pending = self.ledger.verify(&input.email, &input.otp).await?;

        // The email may have been registered by a concurrent request since
        // issuance; the send-otp existence check does not hold here.
        if let Some(existing) = self.users.find_by_email(&input.email).await? {
            return Err(email_conflict(existing.provider));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email: input.email.clone(),
            name: pending.name,
            password_hash: Some(hash_password(&pending.password)?),
            provider: AuthProvider::Credentials,
            provider_id: None,
            image: None,
            is_admin: false,
            email_verified_at: Some(now),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };

        match self.users.create(&user).await {
            Ok(()) => {}
            // Lost the insert race on the unique email constraint: report
            // the conflict for whichever provider won, not a 500.
            Err(AuthServiceError::DuplicateEmail) => {
                let winner = self.users.find_by_email(&input.email).await?;
                return Err(match winner {
                    Some(existing) => email_conflict(existing.provider),
                    None => AuthServiceError::DuplicateEmail,
                });
            }
            Err(e) => return Err(e),
        }

        self.rate_limiter.reset(&input.email).await?;

        let session = issue_session(&self.sessions, user.id).await?;
        tracing::info!(user_id = %user.id, "registration verified, account created");
        Ok(VerifyOtpOutput {
            user,
            token: session.token,
        })
    }
}
