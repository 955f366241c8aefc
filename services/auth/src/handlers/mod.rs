pub mod oauth;
pub mod registration;
pub mod session;
pub mod user;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::types::User;

/// User payload returned by login, registration, and profile endpoints.
/// The password hash never leaves the service.
#[derive(Debug, Serialize)]
pub struct UserBody {
    pub id: uuid::Uuid,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    pub provider: &'static str,
    pub is_admin: bool,
    #[serde(serialize_with = "halalan_core::serde::to_rfc3339_ms_opt")]
    pub email_verified_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "halalan_core::serde::to_rfc3339_ms_opt")]
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "halalan_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            image: user.image,
            provider: user.provider.as_str(),
            is_admin: user.is_admin,
            email_verified_at: user.email_verified_at,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}
