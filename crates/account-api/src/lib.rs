//! # account-api
//!
//! HTTP API layer for the account service built on Axum.
//!
//! Provides the enrollment, session, and admin endpoints, the bearer,
//! refresh-cookie, and CSRF extractors, cookie helpers, middleware
//! (CORS, logging), and DTOs.

pub mod app;
pub mod cookies;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
