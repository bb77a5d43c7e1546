//! Route definitions for the account HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(user_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors, state.csrf.header_name());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(state.config.server.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Enrollment, session, and admin endpoints.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/registration/", post(handlers::enrollment::register))
        .route(
            "/user/signin/{email}/{token}/",
            get(handlers::enrollment::signin_prompt).post(handlers::enrollment::signin_confirm),
        )
        .route("/user/login/token/", post(handlers::auth::login))
        .route("/user/login/token/refresh/", post(handlers::auth::refresh))
        .route("/user/logout/token/", post(handlers::auth::logout))
        .route("/user/profile_mail/", get(handlers::admin::list_mail_profiles))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
