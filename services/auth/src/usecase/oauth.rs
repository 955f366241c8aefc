use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::types::{AuthProvider, User, validate_email};
use crate::error::{AuthServiceError, FieldError};
use crate::usecase::session::issue_session;

pub struct GoogleCallbackInput {
    pub email: String,
    pub name: String,
    pub google_id: String,
    pub image: Option<String>,
}

#[derive(Debug)]
pub struct GoogleCallbackOutput {
    pub user: User,
    pub token: String,
}

/// Upsert flow for a verified Google sign-in: an existing account (under
/// either provider) gets its last-login stamped and avatar refreshed; an
/// unknown email becomes a new provider=google account with the email
/// pre-verified.
pub struct GoogleCallbackUseCase<U: UserRepository, S: SessionRepository> {
    pub users: U,
    pub sessions: S,
}

impl<U: UserRepository, S: SessionRepository> GoogleCallbackUseCase<U, S> {
    pub async fn execute(
        &self,
        input: GoogleCallbackInput,
    ) -> Result<GoogleCallbackOutput, AuthServiceError> {
        let mut errors = Vec::new();
        if !validate_email(&input.email) {
            errors.push(FieldError::new("email", "must be a valid email address"));
        }
        if input.name.trim().is_empty() {
            errors.push(FieldError::new("name", "is required"));
        }
        if input.google_id.trim().is_empty() {
            errors.push(FieldError::new("google_id", "is required"));
        }
        if !errors.is_empty() {
            return Err(AuthServiceError::Validation(errors));
        }

        let now = Utc::now();
        let user = match self.users.find_by_email(&input.email).await? {
            Some(mut user) => {
                let image = input.image.or_else(|| user.image.clone());
                self.users
                    .record_oauth_login(user.id, image.as_deref(), now)
                    .await?;
                user.image = image;
                user.last_login_at = Some(now);
                user
            }
            None => {
                let user = User {
                    id: Uuid::now_v7(),
                    email: input.email,
                    name: input.name,
                    password_hash: None,
                    provider: AuthProvider::Google,
                    provider_id: Some(input.google_id),
                    image: input.image,
                    is_admin: false,
                    email_verified_at: Some(now),
                    last_login_at: Some(now),
                    created_at: now,
                    updated_at: now,
                };
                self.users.create(&user).await?;
                user
            }
        };

        let session = issue_session(&self.sessions, user.id).await?;
        Ok(GoogleCallbackOutput {
            user,
            token: session.token,
        })
    }
}
