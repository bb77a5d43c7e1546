//! Profile repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use account_core::error::{AppError, ErrorKind};
use account_core::result::AppResult;
use account_entity::profile::{CreateProfile, Profile};

use super::ProfileStore;

/// Repository for profile rows.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn create(&self, data: &CreateProfile) -> AppResult<Profile> {
        let now = Utc::now();
        sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (id, account_id, company_id, name, email, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) \
             RETURNING *",
        )
        .bind(data.id)
        .bind(data.account_id)
        .bind(data.company_id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if matches!(
                    db_err.constraint(),
                    Some("profiles_pkey") | Some("profiles_account_id_key")
                ) =>
            {
                AppError::conflict("Profile already exists for this account")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create profile", e),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find profile", e))
    }
}
