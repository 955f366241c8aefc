use sea_orm::Database;
use tracing::info;

use halalan_auth::config::AuthConfig;
use halalan_auth::infra::mail::HttpMailer;
use halalan_auth::router::build_router;
use halalan_auth::state::AppState;
use halalan_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let mailer = HttpMailer::new(config.mail_api_url.clone(), config.mail_from.clone());

    let state = AppState {
        db,
        redis,
        mailer,
        cookie_domain: config.cookie_domain,
        otp_fallback_in_response: config.otp_fallback_in_response,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
