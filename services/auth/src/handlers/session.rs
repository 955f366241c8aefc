use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;

use halalan_session_types::cookie::{clear_session_cookie, set_session_cookie};

use crate::error::AuthServiceError;
use crate::identity::Identity;
use crate::state::AppState;
use crate::usecase::session::{AdminLoginUseCase, LoginInput, LoginUseCase, LogoutUseCase};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ── POST /login ──────────────────────────────────────────────────────────────

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        sessions: state.session_repo(),
    };

    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    let jar = set_session_cookie(jar, out.token.clone(), state.cookie_domain.clone());
    let body = json!({
        "message": "Login successful",
        "user": super::UserBody::from(out.user),
        "token": out.token,
    });

    Ok((jar, Json(body)))
}

// ── POST /admin/login ────────────────────────────────────────────────────────

pub async fn admin_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = AdminLoginUseCase {
        users: state.user_repo(),
        sessions: state.session_repo(),
    };

    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    let jar = set_session_cookie(jar, out.token.clone(), state.cookie_domain.clone());
    let body = json!({
        "message": "Admin login successful",
        "user": super::UserBody::from(out.user),
        "token": out.token,
    });

    Ok((jar, Json(body)))
}

// ── POST /logout ─────────────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    identity: Identity,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = LogoutUseCase {
        sessions: state.session_repo(),
    };
    usecase.execute(identity.session_token.as_deref()).await?;

    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    Ok((jar, Json(json!({ "message": "Logged out successfully" }))))
}
