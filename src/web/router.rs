//! Router configuration for the Nestly API.

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{delete_profile, google, login, logout, signup, update_profile, AppState};
use super::middleware::{create_cors_layer, session_auth};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/google", post(google))
        .route("/logout", get(logout));

    let user_routes = Router::new()
        .route("/update/:id", post(update_profile))
        .route("/delete/:id", delete(delete_profile));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/user", user_routes);

    let issuer = Arc::new(app_state.issuer.clone());

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let issuer = issuer.clone();
                    session_auth(issuer, req, next)
                })),
        )
        .with_state(app_state)
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
