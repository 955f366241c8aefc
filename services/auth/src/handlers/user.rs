use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde_json::json;

use halalan_session_types::cookie::clear_session_cookie;

use crate::error::AuthServiceError;
use crate::identity::Identity;
use crate::state::AppState;
use crate::usecase::user::DeleteAccountUseCase;

// ── GET /user/profile ────────────────────────────────────────────────────────

pub async fn profile(identity: Identity) -> Json<super::UserBody> {
    Json(super::UserBody::from(identity.user))
}

// ── DELETE /user/account ─────────────────────────────────────────────────────

pub async fn delete_account(
    State(state): State<AppState>,
    identity: Identity,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = DeleteAccountUseCase {
        users: state.user_repo(),
    };
    usecase.execute(identity.user.id).await?;

    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    Ok((jar, Json(json!({ "message": "Account deleted successfully" }))))
}
