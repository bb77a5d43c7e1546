//! Application state shared across all handlers and extractors.

use std::sync::Arc;

use account_auth::csrf::CsrfGuard;
use account_auth::session::SessionManager;
use account_cache::provider::CacheManager;
use account_core::config::AppConfig;
use account_database::{DatabasePool, Stores};
use account_service::enrollment::EnrollmentService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool; `None` with the memory backend
    pub db_pool: Option<DatabasePool>,
    /// Cache manager (Redis or in-memory)
    pub cache: Arc<CacheManager>,
    /// Store implementations
    pub stores: Stores,

    // ── Auth ─────────────────────────────────────────────────
    /// Session lifecycle manager
    pub session_manager: Arc<SessionManager>,
    /// CSRF double-submit guard
    pub csrf: Arc<CsrfGuard>,

    // ── Services ─────────────────────────────────────────────
    /// Registration and confirmation
    pub enrollment_service: Arc<EnrollmentService>,
}
