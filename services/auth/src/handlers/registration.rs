use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;

use halalan_session_types::cookie::set_session_cookie;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::otp::OtpLedger;
use crate::usecase::rate_limit::RateLimiter;
use crate::usecase::registration::{
    OtpDelivery, SendOtpInput, SendOtpUseCase, VerifyOtpInput, VerifyOtpUseCase,
};

// ── POST /auth/send-otp ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = SendOtpUseCase {
        users: state.user_repo(),
        ledger: OtpLedger {
            otps: state.otp_repo(),
            cache: state.registration_cache(),
        },
        rate_limiter: RateLimiter {
            cache: state.registration_cache(),
        },
        mailer: state.mailer(),
    };

    let out = usecase
        .execute(SendOtpInput {
            email: body.email,
            name: body.name,
            password: body.password,
        })
        .await?;

    let response = match out.delivery {
        OtpDelivery::Sent => json!({
            "message": "OTP sent successfully to your email",
            "success": true,
        }),
        OtpDelivery::MailUnconfigured => {
            if !state.otp_fallback_in_response {
                return Err(AuthServiceError::MailUnavailable);
            }
            json!({
                "message": "OTP generated (mail not configured)",
                "success": true,
                "otp": out.code,
                "warning": "Mail relay is not configured; code returned inline.",
            })
        }
        OtpDelivery::SendFailed(reason) => {
            if !state.otp_fallback_in_response {
                return Err(AuthServiceError::MailUnavailable);
            }
            json!({
                "message": "OTP generated. Check your email. If you did not receive it, use the code below.",
                "success": true,
                "otp": out.code,
                "warning": format!("Email sending failed: {reason}"),
                "email_sent": false,
            })
        }
    };

    Ok(Json(response))
}

// ── POST /auth/verify-otp ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = VerifyOtpUseCase {
        users: state.user_repo(),
        ledger: OtpLedger {
            otps: state.otp_repo(),
            cache: state.registration_cache(),
        },
        rate_limiter: RateLimiter {
            cache: state.registration_cache(),
        },
        sessions: state.session_repo(),
    };

    let out = usecase
        .execute(VerifyOtpInput {
            email: body.email,
            otp: body.otp,
        })
        .await?;

    let jar = set_session_cookie(jar, out.token.clone(), state.cookie_domain.clone());
    let body = json!({
        "message": "Email verified and account created successfully",
        "user": super::UserBody::from(out.user),
        "token": out.token,
    });

    Ok((StatusCode::CREATED, jar, Json(body)))
}
