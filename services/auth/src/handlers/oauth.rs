use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;

use halalan_session_types::cookie::set_session_cookie;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::oauth::{GoogleCallbackInput, GoogleCallbackUseCase};

// ── POST /auth/google ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GoogleCallbackRequest {
    pub email: String,
    pub name: String,
    pub google_id: String,
    pub image: Option<String>,
}

pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<GoogleCallbackRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = GoogleCallbackUseCase {
        users: state.user_repo(),
        sessions: state.session_repo(),
    };

    let out = usecase
        .execute(GoogleCallbackInput {
            email: body.email,
            name: body.name,
            google_id: body.google_id,
            image: body.image,
        })
        .await?;

    let jar = set_session_cookie(jar, out.token.clone(), state.cookie_domain.clone());
    let body = json!({
        "message": "Google authentication successful",
        "user": super::UserBody::from(out.user),
        "token": out.token,
    });

    Ok((jar, Json(body)))
}
