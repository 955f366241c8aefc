/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL.
    pub redis_url: String,
    /// Cookie domain attribute (root domain, e.g. "halalan.ph").
    pub cookie_domain: String,
    /// TCP port to listen on (default 3110). Env var: `AUTH_PORT`.
    pub auth_port: u16,
    /// HTTP mail relay endpoint. Unset means mail is not configured.
    /// Env var: `MAIL_API_URL`.
    pub mail_api_url: Option<String>,
    /// Sender address for outbound mail. Env var: `MAIL_FROM`.
    pub mail_from: String,
    /// When true, a failed or unconfigured mail dispatch echoes the OTP in
    /// the send-otp response instead of failing. Weakens the verification
    /// guarantee; keep off outside development. Env var:
    /// `OTP_FALLBACK_IN_RESPONSE`.
    pub otp_fallback_in_response: bool,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            auth_port: std::env::var("AUTH_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3110),
            mail_api_url: std::env::var("MAIL_API_URL").ok().filter(|v| !v.is_empty()),
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "no-reply@halalan.ph".to_owned()),
            otp_fallback_in_response: std::env::var("OTP_FALLBACK_IN_RESPONSE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}
