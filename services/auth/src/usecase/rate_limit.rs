use chrono::Utc;

use crate::domain::repository::RegistrationCache;
use crate::domain::types::{
    OTP_BASE_COOLDOWN_SECS, OTP_EXTENDED_AFTER_ATTEMPTS, OTP_EXTENDED_COOLDOWN_SECS,
};
use crate::error::AuthServiceError;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Remaining whole seconds of cooldown; 0 when allowed.
    pub wait_seconds: i64,
    /// Attempt count after this check (unchanged on denial).
    pub attempt_number: u32,
}

/// Round a cooldown up to whole minutes for display.
pub fn minutes_rounded_up(seconds: i64) -> i64 {
    (seconds + 59) / 60
}

/// Per-email send throttle with a tiered cooldown: 1 minute between sends,
/// stretching to 3 minutes once an email has accumulated
/// [`OTP_EXTENDED_AFTER_ATTEMPTS`] sends inside the 24-hour window.
pub struct RateLimiter<C: RegistrationCache> {
    pub cache: C,
}

impl<C: RegistrationCache> RateLimiter<C> {
    /// Check the cooldown and, if the send is allowed, record it.
    /// A first-ever request (no last-sent stamp) is always allowed.
    pub async fn check_and_record(
        &self,
        email: &str,
    ) -> Result<RateLimitDecision, AuthServiceError> {
        let attempts = self.cache.attempts(email).await?;

        if let Some(last_sent) = self.cache.last_sent_at(email).await? {
            let cooldown = if attempts >= OTP_EXTENDED_AFTER_ATTEMPTS {
                OTP_EXTENDED_COOLDOWN_SECS
            } else {
                OTP_BASE_COOLDOWN_SECS
            };
            let elapsed = (Utc::now() - last_sent).num_seconds();
            let remaining = cooldown - elapsed;
            if remaining > 0 {
                return Ok(RateLimitDecision {
                    allowed: false,
                    wait_seconds: remaining,
                    attempt_number: attempts,
                });
            }
        }

        let attempts = attempts + 1;
        self.cache.record_send(email, attempts, Utc::now()).await?;
        Ok(RateLimitDecision {
            allowed: true,
            wait_seconds: 0,
            attempt_number: attempts,
        })
    }

    /// Forget the counters (successful verification), so a future
    /// registration for the same email starts from a clean slate.
    pub async fn reset(&self, email: &str) -> Result<(), AuthServiceError> {
        self.cache.clear_rate_limit(email).await
    }
}
