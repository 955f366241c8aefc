use axum::{
    Router,
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use halalan_core::health::{healthz, readyz};
use halalan_core::middleware::request_id_layer;

use crate::handlers::{
    oauth::google_callback,
    registration::{send_otp, verify_otp},
    session::{admin_login, login, logout},
    user::{delete_account, profile},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Registration
        .route("/auth/send-otp", post(send_otp))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/google", post(google_callback))
        // Sessions
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/admin/login", post(admin_login))
        // Account
        .route("/user/profile", get(profile))
        .route("/user/account", delete(delete_account))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}
