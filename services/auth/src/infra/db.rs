use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use halalan_auth_schema::{one_time_codes, sessions, users};

use crate::domain::repository::{OtpRepository, SessionRepository, UserRepository};
use crate::domain::types::{AuthProvider, OneTimeCode, Session, User};
use crate::error::AuthServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), AuthServiceError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            name: Set(user.name.clone()),
            password_hash: Set(user.password_hash.clone()),
            provider: Set(user.provider.as_str().to_owned()),
            provider_id: Set(user.provider_id.clone()),
            image: Set(user.image.clone()),
            is_admin: Set(user.is_admin),
            email_verified_at: Set(user.email_verified_at),
            last_login_at: Set(user.last_login_at),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            // The unique email constraint is the arbiter under concurrent
            // registration; losing it is a conflict, not a server fault.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AuthServiceError::DuplicateEmail)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(id),
            last_login_at: Set(Some(at)),
            updated_at: Set(at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("record login")?;
        Ok(())
    }

    async fn record_oauth_login(
        &self,
        id: Uuid,
        image: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            last_login_at: Set(Some(at)),
            updated_at: Set(at),
            ..Default::default()
        };
        if let Some(image) = image {
            am.image = Set(Some(image.to_owned()));
        }
        am.update(&self.db).await.context("record oauth login")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        name: model.name,
        password_hash: model.password_hash,
        provider: AuthProvider::from_str_lossy(&model.provider),
        provider_id: model.provider_id,
        image: model.image,
        is_admin: model.is_admin,
        email_verified_at: model.email_verified_at,
        last_login_at: model.last_login_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── One-time-code repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn replace_for_email(&self, code: &OneTimeCode) -> Result<(), AuthServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let code = code.clone();
                Box::pin(async move {
                    delete_codes_for_email(txn, &code.email).await?;
                    insert_code(txn, &code).await?;
                    Ok(())
                })
            })
            .await
            .context("replace one-time code")?;
        Ok(())
    }

    async fn find_by_email_and_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<OneTimeCode>, AuthServiceError> {
        let model = one_time_codes::Entity::find()
            .filter(one_time_codes::Column::Email.eq(email))
            .filter(one_time_codes::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("find one-time code")?;
        Ok(model.map(code_from_model))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AuthServiceError> {
        one_time_codes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete one-time code")?;
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, AuthServiceError> {
        let now = Utc::now();
        let result = one_time_codes::Entity::delete_many()
            .filter(one_time_codes::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .context("delete expired one-time codes")?;
        Ok(result.rows_affected)
    }
}

async fn delete_codes_for_email(
    txn: &DatabaseTransaction,
    email: &str,
) -> Result<(), sea_orm::DbErr> {
    one_time_codes::Entity::delete_many()
        .filter(one_time_codes::Column::Email.eq(email))
        .exec(txn)
        .await?;
    Ok(())
}

async fn insert_code(txn: &DatabaseTransaction, code: &OneTimeCode) -> Result<(), sea_orm::DbErr> {
    one_time_codes::ActiveModel {
        id: Set(code.id),
        email: Set(code.email.clone()),
        code: Set(code.code.clone()),
        expires_at: Set(code.expires_at),
        created_at: Set(code.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn code_from_model(model: one_time_codes::Model) -> OneTimeCode {
    OneTimeCode {
        id: model.id,
        email: model.email,
        code: model.code,
        expires_at: model.expires_at,
        created_at: model.created_at,
    }
}

// ── Session repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn create(&self, session: &Session) -> Result<(), AuthServiceError> {
        sessions::ActiveModel {
            id: Set(session.id),
            token: Set(session.token.clone()),
            user_id: Set(session.user_id),
            expires_at: Set(session.expires_at),
            created_at: Set(session.created_at),
        }
        .insert(&self.db)
        .await
        .context("create session")?;
        Ok(())
    }

    async fn find_valid_by_token(
        &self,
        token: &str,
    ) -> Result<Option<Session>, AuthServiceError> {
        let now = Utc::now();
        let model = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .filter(sessions::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find valid session")?;
        Ok(model.map(session_from_model))
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, AuthServiceError> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::Token.eq(token))
            .exec(&self.db)
            .await
            .context("delete session")?;
        Ok(result.rows_affected > 0)
    }
}

fn session_from_model(model: sessions::Model) -> Session {
    Session {
        id: model.id,
        token: model.token,
        user_id: model.user_id,
        expires_at: model.expires_at,
        created_at: model.created_at,
    }
}
