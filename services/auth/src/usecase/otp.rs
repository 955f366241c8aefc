use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::{OtpRepository, RegistrationCache};
use crate::domain::types::{OTP_TTL_SECS, OneTimeCode, PendingRegistration};
use crate::error::AuthServiceError;

/// Generate a uniformly random 6-digit code, leading zeros preserved
/// (e.g. `"000042"`).
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    format!("{:06}", rng.random_range(0..1_000_000u32))
}

/// Ledger of one-time codes plus their pending registration payloads.
///
/// Invariant: at most one live code per email — issuance replaces any
/// prior rows for that email in a single transaction.
pub struct OtpLedger<O, C>
where
    O: OtpRepository,
    C: RegistrationCache,
{
    pub otps: O,
    pub cache: C,
}

impl<O, C> OtpLedger<O, C>
where
    O: OtpRepository,
    C: RegistrationCache,
{
    /// Issue a fresh code for the email and stash the registration payload
    /// with the same lifetime. Expired rows (for any email) are swept
    /// opportunistically first.
    pub async fn issue(
        &self,
        email: &str,
        pending: &PendingRegistration,
    ) -> Result<String, AuthServiceError> {
        self.otps.delete_expired().await?;

        let code = generate_code();
        let now = Utc::now();
        let row = OneTimeCode {
            id: Uuid::now_v7(),
            email: email.to_owned(),
            code: code.clone(),
            expires_at: now + Duration::seconds(OTP_TTL_SECS),
            created_at: now,
        };
        self.otps.replace_for_email(&row).await?;
        self.cache.put_pending(email, pending).await?;
        Ok(code)
    }

    /// Validate a submitted code and hand back the pending payload.
    ///
    /// All failure states are terminal for this issuance; the caller must
    /// restart with a fresh `issue`. An expired match is deleted as a side
    /// effect.
    pub async fn verify(
        &self,
        email: &str,
        submitted: &str,
    ) -> Result<PendingRegistration, AuthServiceError> {
        let row = self
            .otps
            .find_by_email_and_code(email, submitted)
            .await?
            .ok_or(AuthServiceError::InvalidOtp)?;

        if row.is_expired() {
            self.otps.delete(row.id).await?;
            return Err(AuthServiceError::OtpExpired);
        }

        self.otps.delete(row.id).await?;

        // The payload can be gone even for a live code: cache eviction, or
        // a verify racing just past the 5-minute TTL.
        self.cache
            .take_pending(email)
            .await?
            .ok_or(AuthServiceError::RegistrationDataMissing)
    }
}
