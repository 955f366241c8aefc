use chrono::{DateTime, Utc};
use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use crate::domain::repository::RegistrationCache;
use crate::domain::types::{OTP_RATE_WINDOW_SECS, OTP_TTL_SECS, PendingRegistration};
use crate::error::AuthServiceError;

/// Redis-backed registration cache. Key layout matches the legacy system:
/// `otp_attempts_{email}`, `otp_last_sent_{email}` (24 h TTL) and
/// `otp_data_{email}` (5 min TTL, same as the code).
#[derive(Clone)]
pub struct RedisRegistrationCache {
    pub pool: Pool,
}

fn attempts_key(email: &str) -> String {
    format!("otp_attempts_{email}")
}

fn last_sent_key(email: &str) -> String {
    format!("otp_last_sent_{email}")
}

fn pending_key(email: &str) -> String {
    format!("otp_data_{email}")
}

impl RedisRegistrationCache {
    async fn conn(&self) -> Result<deadpool_redis::Connection, AuthServiceError> {
        self.pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))
    }
}

impl RegistrationCache for RedisRegistrationCache {
    async fn attempts(&self, email: &str) -> Result<u32, AuthServiceError> {
        let mut conn = self.conn().await?;
        let value: Option<u32> = conn
            .get(attempts_key(email))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(value.unwrap_or(0))
    }

    async fn last_sent_at(
        &self,
        email: &str,
    ) -> Result<Option<DateTime<Utc>>, AuthServiceError> {
        let mut conn = self.conn().await?;
        let value: Option<i64> = conn
            .get(last_sent_key(email))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(value.and_then(|secs| DateTime::from_timestamp(secs, 0)))
    }

    async fn record_send(
        &self,
        email: &str,
        attempts: u32,
        at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        let mut conn = self.conn().await?;
        let window = OTP_RATE_WINDOW_SECS as u64;
        let (): () = conn
            .set_ex(attempts_key(email), attempts, window)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(last_sent_key(email), at.timestamp(), window)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(())
    }

    async fn clear_rate_limit(&self, email: &str) -> Result<(), AuthServiceError> {
        let mut conn = self.conn().await?;
        let (): () = conn
            .del(&[attempts_key(email), last_sent_key(email)])
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(())
    }

    async fn put_pending(
        &self,
        email: &str,
        pending: &PendingRegistration,
    ) -> Result<(), AuthServiceError> {
        let payload = serde_json::to_string(pending)
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let mut conn = self.conn().await?;
        let (): () = conn
            .set_ex(pending_key(email), payload, OTP_TTL_SECS as u64)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(())
    }

    async fn take_pending(
        &self,
        email: &str,
    ) -> Result<Option<PendingRegistration>, AuthServiceError> {
        let mut conn = self.conn().await?;
        let payload: Option<String> = conn
            .get_del(pending_key(email))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        payload
            .map(|p| serde_json::from_str(&p).map_err(|e| AuthServiceError::Internal(e.into())))
            .transpose()
    }
}
