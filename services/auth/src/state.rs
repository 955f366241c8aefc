use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use crate::infra::cache::RedisRegistrationCache;
use crate::infra::db::{DbOtpRepository, DbSessionRepository, DbUserRepository};
use crate::infra::mail::HttpMailer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub mailer: HttpMailer,
    pub cookie_domain: String,
    /// Echo the OTP in the send-otp response when mail dispatch is
    /// unavailable. Development convenience; see config.
    pub otp_fallback_in_response: bool,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_repo(&self) -> DbOtpRepository {
        DbOtpRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn registration_cache(&self) -> RedisRegistrationCache {
        RedisRegistrationCache {
            pool: self.redis.clone(),
        }
    }

    pub fn mailer(&self) -> HttpMailer {
        self.mailer.clone()
    }
}
