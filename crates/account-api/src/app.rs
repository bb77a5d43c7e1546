//! Application builder: wires stores, services, and state into an Axum app.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tracing::{error, info, warn};

use account_auth::csrf::CsrfGuard;
use account_auth::ledger::RevocationLedger;
use account_auth::password::PasswordHasher;
use account_auth::secret::EnrollmentSecretStore;
use account_auth::session::SessionManager;
use account_cache::provider::CacheManager;
use account_core::config::AppConfig;
use account_core::error::AppError;
use account_core::result::AppResult;
use account_database::migration::run_migrations;
use account_database::{DatabasePool, Stores};
use account_service::enrollment::EnrollmentService;
use account_service::notify::{MailDispatcher, notifier};

use crate::router::build_router;
use crate::state::AppState;

/// Time allowed for queued mail to drain after the server stops.
const MAIL_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the account server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!("Starting account server...");

    // ── Step 1: Persistence ──────────────────────────────────────
    let (stores, db_pool) = match config.database.provider.as_str() {
        "postgres" => {
            let pool = DatabasePool::connect(&config.database).await?;
            if config.database.run_migrations {
                info!("Running database migrations...");
                run_migrations(pool.pool()).await?;
            }
            (Stores::postgres(pool.pool().clone()), Some(pool))
        }
        "memory" => {
            warn!("Using in-memory stores, data is lost on restart");
            (Stores::memory(), None)
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: postgres, memory"
            )));
        }
    };

    // ── Step 2: Cache ────────────────────────────────────────────
    info!(provider = %config.cache.provider, "Initializing cache...");
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    // ── Step 3: Auth ─────────────────────────────────────────────
    let password_hasher = Arc::new(PasswordHasher::new());
    let ledger = Arc::new(RevocationLedger::new(stores.revocations.clone()));
    let session_manager = Arc::new(SessionManager::new(
        config.auth.clone(),
        stores.users.clone(),
        stores.accounts.clone(),
        Arc::clone(&ledger),
        Arc::clone(&password_hasher),
    ));
    let csrf = Arc::new(CsrfGuard::new(&config.csrf));
    let secrets = Arc::new(EnrollmentSecretStore::new(
        Arc::clone(&cache),
        Duration::from_secs(config.enrollment.secret_ttl_hours * 3600),
    ));

    // ── Step 4: Mail dispatch ────────────────────────────────────
    let (mailer, mail_worker) = MailDispatcher::start(
        notifier::from_config(&config.notifier)?,
        config.notifier.queue_capacity,
        Duration::from_secs(config.notifier.send_timeout_seconds),
    );

    // ── Step 5: Services ─────────────────────────────────────────
    let enrollment_service = Arc::new(EnrollmentService::new(
        &stores,
        secrets,
        password_hasher,
        Arc::clone(&session_manager),
        mailer,
        config.enrollment.clone(),
    ));

    // ── Step 6: Background tasks ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let purge_period =
        Duration::from_secs(config.auth.revocation_purge_interval_minutes.max(1) * 60);
    let purge_task = ledger.spawn_purge_task(purge_period, shutdown_rx);

    // ── Step 7: Build and start HTTP server ──────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_app(AppState {
        config: Arc::new(config),
        db_pool: db_pool.clone(),
        cache,
        stores,
        session_manager,
        csrf,
        enrollment_service,
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(addr = %addr, "Account server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Shutdown ─────────────────────────────────────────────────
    let _ = shutdown_tx.send(true);
    if let Err(e) = purge_task.await {
        error!(error = %e, "Revocation purge task ended abnormally");
    }

    // The router owned the last mail sender; the worker exits once the queue drains.
    if tokio::time::timeout(MAIL_DRAIN_TIMEOUT, mail_worker)
        .await
        .is_err()
    {
        warn!("Mail queue did not drain before shutdown");
    }

    if let Some(pool) = db_pool {
        pool.close().await;
    }

    info!("Account server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
