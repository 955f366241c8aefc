use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::error::AuthServiceError;

/// Hard-delete an account. Sessions are removed by the FK cascade; no
/// other data survives for this user.
pub struct DeleteAccountUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeleteAccountUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(), AuthServiceError> {
        let deleted = self.users.delete(user_id).await?;
        if deleted {
            tracing::info!(user_id = %user_id, "account deleted");
        }
        Ok(())
    }
}
