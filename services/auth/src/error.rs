use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// A single field-level validation failure.
#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("Email already registered. Please use login instead.")]
    DuplicateEmail,
    #[error(
        "This email is already registered with Google. Please sign in using Google OAuth instead."
    )]
    EmailRegisteredWithGoogle,
    #[error("Please wait {cooldown_minutes} minute(s) before requesting a new OTP.")]
    RateLimited {
        cooldown_seconds: i64,
        cooldown_minutes: i64,
    },
    #[error("Invalid OTP code")]
    InvalidOtp,
    #[error("OTP has expired. Please request a new one.")]
    OtpExpired,
    #[error("Registration data expired. Please start over.")]
    RegistrationDataMissing,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(
        "This account was created with Google. Please sign in with Google or set a password first."
    )]
    PasswordNotSet,
    #[error("Password not set for this admin account")]
    AdminPasswordNotSet,
    #[error("Admin access required")]
    AdminRequired,
    #[error("No session token provided")]
    Unauthenticated,
    #[error("Invalid or expired session. Please log in again.")]
    InvalidSession,
    #[error("User not found")]
    UserNotFound,
    #[error("Email service is not configured. Please contact support.")]
    MailUnavailable,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::EmailRegisteredWithGoogle => "EMAIL_REGISTERED_WITH_GOOGLE",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::InvalidOtp => "INVALID_OTP",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::RegistrationDataMissing => "REGISTRATION_DATA_MISSING",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::PasswordNotSet => "PASSWORD_NOT_SET",
            Self::AdminPasswordNotSet => "ADMIN_PASSWORD_NOT_SET",
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidSession => "INVALID_SESSION",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::MailUnavailable => "MAIL_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DuplicateEmail
            | Self::EmailRegisteredWithGoogle
            | Self::InvalidOtp
            | Self::OtpExpired
            | Self::RegistrationDataMissing => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidCredentials
            | Self::PasswordNotSet
            | Self::AdminPasswordNotSet
            | Self::Unauthenticated
            | Self::InvalidSession
            | Self::UserNotFound => StatusCode::UNAUTHORIZED,
            Self::AdminRequired => StatusCode::FORBIDDEN,
            Self::MailUnavailable | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        // Wire shapes match the legacy API: `{errors}` for validation,
        // `{message}` for credential failures, `{error}` otherwise; the
        // auth middleware group carries `error: "Unauthenticated"`.
        let body = match &self {
            Self::Validation(fields) => {
                let mut map = serde_json::Map::new();
                for f in fields {
                    map.entry(f.field)
                        .or_insert_with(|| serde_json::Value::Array(vec![]))
                        .as_array_mut()
                        .expect("errors entries are arrays")
                        .push(serde_json::Value::String(f.message.clone()));
                }
                serde_json::json!({ "errors": map })
            }
            Self::RateLimited {
                cooldown_seconds,
                cooldown_minutes,
            } => serde_json::json!({
                "error": self.to_string(),
                "cooldown_seconds": cooldown_seconds,
                "cooldown_minutes": cooldown_minutes,
            }),
            Self::InvalidCredentials
            | Self::PasswordNotSet
            | Self::AdminPasswordNotSet
            | Self::AdminRequired => serde_json::json!({ "message": self.to_string() }),
            Self::Unauthenticated | Self::InvalidSession | Self::UserNotFound => {
                serde_json::json!({
                    "error": "Unauthenticated",
                    "message": self.to_string(),
                })
            }
            Self::Internal(_) => serde_json::json!({ "error": "Internal server error" }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}
