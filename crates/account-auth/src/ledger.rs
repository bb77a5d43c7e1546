//! Refresh token revocation ledger.
//!
//! Tokens are recorded as a SHA-256 digest paired with the user they were
//! issued to. Lookups match the exact `(token, user)` pair.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use account_core::result::AppResult;
use account_database::repositories::RevocationStore;

/// Durable set of revoked refresh tokens.
#[derive(Debug, Clone)]
pub struct RevocationLedger {
    store: Arc<dyn RevocationStore>,
}

impl RevocationLedger {
    /// Create a ledger over a revocation store.
    pub fn new(store: Arc<dyn RevocationStore>) -> Self {
        Self { store }
    }

    /// Whether `token` has been revoked for `user_id`. Absence means not revoked.
    pub async fn is_revoked(&self, user_id: Uuid, token: &str) -> AppResult<bool> {
        self.store.exists(&token_digest(token), user_id).await
    }

    /// Revoke `token` for `user_id`. Revoking twice is a no-op.
    pub async fn revoke(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let inserted = self
            .store
            .insert(&token_digest(token), user_id, expires_at)
            .await?;

        if inserted {
            info!(user_id = %user_id, "Refresh token revoked");
        } else {
            debug!(user_id = %user_id, "Refresh token already revoked");
        }
        Ok(())
    }

    /// Drop entries whose tokens have expired on their own.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        let purged = self.store.purge_expired(Utc::now()).await?;
        if purged > 0 {
            info!(purged, "Purged expired revocation entries");
        }
        Ok(purged)
    }

    /// Run [`purge_expired`](Self::purge_expired) every `period` until `shutdown` flips.
    pub fn spawn_purge_task(
        self: Arc<Self>,
        period: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.purge_expired().await {
                            error!(error = %e, "Revocation purge failed");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            info!("Revocation purge task stopping");
                            break;
                        }
                    }
                }
            }
        })
    }
}

/// Lowercase hex SHA-256 of a token string.
fn token_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
