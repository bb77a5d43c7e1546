//! Mail profile repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use account_core::error::{AppError, ErrorKind};
use account_core::result::AppResult;
use account_entity::mail_profile::MailProfile;

use super::MailProfileStore;

/// Read-only repository for mail sender profiles.
#[derive(Debug, Clone)]
pub struct MailProfileRepository {
    pool: PgPool,
}

impl MailProfileRepository {
    /// Create a new mail profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MailProfileStore for MailProfileRepository {
    async fn list(&self) -> AppResult<Vec<MailProfile>> {
        sqlx::query_as::<_, MailProfile>(
            "SELECT * FROM mail_profiles ORDER BY is_active DESC, name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list mail profiles", e))
    }
}
