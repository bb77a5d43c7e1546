//! Store traits and their PostgreSQL repositories.
//!
//! The auth and service layers only see the traits; [`Stores`] bundles one
//! implementation of each so the whole set can be swapped between Postgres
//! and the in-memory backend at startup.

pub mod account;
pub mod company;
pub mod mail_profile;
pub mod profile;
pub mod revocation;
pub mod user;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use account_core::result::AppResult;
use account_entity::account::{Account, CreateAccount};
use account_entity::company::{Company, CreateCompany};
use account_entity::mail_profile::MailProfile;
use account_entity::profile::{CreateProfile, Profile};
use account_entity::user::{CreateUser, User};

pub use self::account::AccountRepository;
pub use self::company::CompanyRepository;
pub use self::mail_profile::MailProfileRepository;
pub use self::profile::ProfileRepository;
pub use self::revocation::RevocationRepository;
pub use self::user::UserRepository;

/// Persistence for identities.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a user. Fails with `Conflict` on a duplicate username or email.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by exact username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find a user by exact email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Replace the stored credential.
    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<()>;

    /// Delete a user and everything that cascades from it. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Persistence for accounts.
#[async_trait]
pub trait AccountStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert an account. Fails with `Conflict` if the user already has one.
    async fn create(&self, data: &CreateAccount) -> AppResult<Account>;

    /// Find the account owned by a user.
    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Account>>;

    /// Find the account carrying an enrollment token.
    async fn find_by_enrollment_token(&self, token: Uuid) -> AppResult<Option<Account>>;
}

/// Persistence for companies.
#[async_trait]
pub trait CompanyStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a company.
    async fn create(&self, data: &CreateCompany) -> AppResult<Company>;

    /// Delete a company. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Persistence for profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a profile. Fails with `Conflict` if the id or account is taken.
    async fn create(&self, data: &CreateProfile) -> AppResult<Profile>;

    /// Find a profile by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>>;
}

/// Persistence for the refresh token revocation ledger.
#[async_trait]
pub trait RevocationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Record a revocation. Returns `false` if the pair was already present.
    async fn insert(
        &self,
        token_hash: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Whether the exact `(token_hash, user_id)` pair is recorded.
    async fn exists(&self, token_hash: &str, user_id: Uuid) -> AppResult<bool>;

    /// Drop entries for tokens that expired before `now`. Returns the number removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Read access to outbound mail sender profiles.
#[async_trait]
pub trait MailProfileStore: Send + Sync + std::fmt::Debug + 'static {
    /// List every profile, active ones first.
    async fn list(&self) -> AppResult<Vec<MailProfile>>;
}

/// One implementation of every store, shared behind `Arc`s.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Identities.
    pub users: Arc<dyn UserStore>,
    /// Accounts.
    pub accounts: Arc<dyn AccountStore>,
    /// Companies.
    pub companies: Arc<dyn CompanyStore>,
    /// Profiles.
    pub profiles: Arc<dyn ProfileStore>,
    /// Revocation ledger rows.
    pub revocations: Arc<dyn RevocationStore>,
    /// Mail sender profiles.
    pub mail_profiles: Arc<dyn MailProfileStore>,
}

impl Stores {
    /// Postgres-backed stores sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            accounts: Arc::new(AccountRepository::new(pool.clone())),
            companies: Arc::new(CompanyRepository::new(pool.clone())),
            profiles: Arc::new(ProfileRepository::new(pool.clone())),
            revocations: Arc::new(RevocationRepository::new(pool.clone())),
            mail_profiles: Arc::new(MailProfileRepository::new(pool)),
        }
    }

    /// In-process stores sharing one set of tables.
    #[cfg(feature = "memory")]
    pub fn memory() -> Self {
        Self::from_memory(Arc::new(crate::memory::MemoryStore::new()))
    }

    /// Stores backed by an existing in-memory store, so callers keep a handle to it.
    #[cfg(feature = "memory")]
    pub fn from_memory(store: Arc<crate::memory::MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            accounts: store.clone(),
            companies: store.clone(),
            profiles: store.clone(),
            revocations: store.clone(),
            mail_profiles: store,
        }
    }
}
