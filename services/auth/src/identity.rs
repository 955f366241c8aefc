//! Request identity resolution.
//!
//! Two strategies behind one interface, consulted in a fixed order:
//! a trusted `X-User-Id` header from privileged internal callers, then a
//! session-token cookie. The resolver is read-only — it never touches
//! session expiry.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use halalan_session_types::X_USER_ID;
use halalan_session_types::cookie::session_token_from_jar;

use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::types::User;
use crate::error::AuthServiceError;
use crate::state::AppState;

/// Raw identity material pulled from an inbound request.
#[derive(Debug, Clone, Default)]
pub struct RequestAuth {
    pub trusted_user_id: Option<String>,
    pub session_token: Option<String>,
}

impl RequestAuth {
    pub fn from_parts(parts: &Parts) -> Self {
        let jar = CookieJar::from_headers(&parts.headers);
        Self {
            trusted_user_id: parts
                .headers
                .get(X_USER_ID)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
            session_token: session_token_from_jar(&jar),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trusted_user_id.is_none() && self.session_token.is_none()
    }
}

/// One way of turning request material into a user id. Strategies return
/// `Ok(None)` when their material is absent, so the resolver can move on
/// to the next one.
#[allow(async_fn_in_trait)]
pub trait IdentityStrategy: Send + Sync {
    async fn resolve(&self, auth: &RequestAuth) -> Result<Option<Uuid>, AuthServiceError>;
}

/// Trusts the `X-User-Id` header outright, bypassing any token lookup.
/// An unparseable id names no known user.
pub struct TrustedHeaderStrategy;

impl IdentityStrategy for TrustedHeaderStrategy {
    async fn resolve(&self, auth: &RequestAuth) -> Result<Option<Uuid>, AuthServiceError> {
        match auth.trusted_user_id.as_deref() {
            None => Ok(None),
            Some(raw) => raw
                .parse::<Uuid>()
                .map(Some)
                .map_err(|_| AuthServiceError::UserNotFound),
        }
    }
}

/// Resolves a session cookie against the session directory. The token must
/// name a row whose expiry is still in the future.
pub struct SessionCookieStrategy<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> IdentityStrategy for SessionCookieStrategy<S> {
    async fn resolve(&self, auth: &RequestAuth) -> Result<Option<Uuid>, AuthServiceError> {
        match auth.session_token.as_deref() {
            None => Ok(None),
            Some(token) => {
                let session = self
                    .sessions
                    .find_valid_by_token(token)
                    .await?
                    .ok_or(AuthServiceError::InvalidSession)?;
                Ok(Some(session.user_id))
            }
        }
    }
}

/// Runs the strategies in order and loads the resolved user.
pub struct ResolveIdentityUseCase<U: UserRepository, S: SessionRepository> {
    pub users: U,
    pub header: TrustedHeaderStrategy,
    pub cookie: SessionCookieStrategy<S>,
}

impl<U: UserRepository, S: SessionRepository> ResolveIdentityUseCase<U, S> {
    pub async fn execute(&self, auth: &RequestAuth) -> Result<User, AuthServiceError> {
        if auth.is_empty() {
            return Err(AuthServiceError::Unauthenticated);
        }

        let user_id = match self.header.resolve(auth).await? {
            Some(id) => id,
            None => self
                .cookie
                .resolve(auth)
                .await?
                .ok_or(AuthServiceError::Unauthenticated)?,
        };

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)
    }
}

/// Authenticated caller, attached by the extractor for downstream handlers.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: User,
    /// The cookie token this request presented, if any. Header-resolved
    /// requests carry none.
    pub session_token: Option<String>,
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = AuthServiceError;

    // Extract values synchronously and return a 'static future so the
    // implementation satisfies axum's `impl Future + Send` signature
    // without borrowing from `parts`.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let auth = RequestAuth::from_parts(parts);
        let state = state.clone();
        async move {
            let resolver = ResolveIdentityUseCase {
                users: state.user_repo(),
                header: TrustedHeaderStrategy,
                cookie: SessionCookieStrategy {
                    sessions: state.session_repo(),
                },
            };
            let user = resolver.execute(&auth).await?;
            Ok(Self {
                user,
                session_token: auth.session_token,
            })
        }
    }
}
