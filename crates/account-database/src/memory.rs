//! In-process implementation of every store.
//!
//! All tables live behind one lock so uniqueness checks and cascading
//! deletes see a consistent view. Intended for local development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use account_core::error::AppError;
use account_core::result::AppResult;
use account_entity::account::{Account, CreateAccount};
use account_entity::company::{Company, CreateCompany};
use account_entity::mail_profile::MailProfile;
use account_entity::profile::{CreateProfile, Profile};
use account_entity::revocation::RevocationEntry;
use account_entity::user::{CreateUser, User};

use crate::repositories::{
    AccountStore, CompanyStore, MailProfileStore, ProfileStore, RevocationStore, UserStore,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    accounts: HashMap<Uuid, Account>,
    companies: HashMap<Uuid, Company>,
    profiles: HashMap<Uuid, Profile>,
    revocations: HashMap<(String, Uuid), RevocationEntry>,
    mail_profiles: Vec<MailProfile>,
}

impl Tables {
    fn delete_account_cascade(&mut self, account_id: Uuid) {
        self.accounts.remove(&account_id);
        self.companies.retain(|_, c| c.account_id != account_id);
        self.profiles.retain(|_, p| p.account_id != account_id);
    }
}

/// Memory-backed store implementing every store trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the admin flag of the account owned by `user_id`.
    pub async fn set_admin(&self, user_id: Uuid, is_admin: bool) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let account = tables
            .accounts
            .values_mut()
            .find(|a| a.user_id == user_id)
            .ok_or_else(|| AppError::not_found(format!("No account for user {user_id}")))?;
        account.is_admin = is_admin;
        Ok(())
    }

    /// Add a mail sender profile.
    pub async fn insert_mail_profile(&self, profile: MailProfile) {
        self.tables.write().await.mail_profiles.push(profile);
    }

    /// Number of stored users.
    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    /// Number of stored accounts.
    pub async fn account_count(&self) -> usize {
        self.tables.read().await.accounts.len()
    }

    /// Number of stored companies.
    pub async fn company_count(&self) -> usize {
        self.tables.read().await.companies.len()
    }

    /// Number of stored profiles.
    pub async fn profile_count(&self) -> usize {
        self.tables.read().await.profiles.len()
    }

    /// Number of stored revocation entries.
    pub async fn revocation_count(&self) -> usize {
        self.tables.read().await.revocations.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == data.username) {
            return Err(AppError::conflict(format!(
                "Username '{}' already exists",
                data.username
            )));
        }
        if tables.users.values().any(|u| u.email == data.email) {
            return Err(AppError::conflict("Email already in use"));
        }

        let user = User {
            id: Uuid::now_v7(),
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        let owned: Vec<Uuid> = tables
            .accounts
            .values()
            .filter(|a| a.user_id == id)
            .map(|a| a.id)
            .collect();
        for account_id in owned {
            tables.delete_account_cascade(account_id);
        }
        tables.revocations.retain(|(_, user_id), _| *user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create(&self, data: &CreateAccount) -> AppResult<Account> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&data.user_id) {
            return Err(AppError::database(format!(
                "Account references missing user {}",
                data.user_id
            )));
        }
        if tables.accounts.values().any(|a| a.user_id == data.user_id) {
            return Err(AppError::conflict("User already has an account"));
        }
        if tables
            .accounts
            .values()
            .any(|a| a.enrollment_token == data.enrollment_token)
        {
            return Err(AppError::conflict("Enrollment token collision"));
        }

        let account = Account {
            id: Uuid::now_v7(),
            user_id: data.user_id,
            is_admin: data.is_admin,
            enrollment_token: data.enrollment_token,
            created_at: Utc::now(),
        };
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Account>> {
        Ok(self
            .tables
            .read()
            .await
            .accounts
            .values()
            .find(|a| a.user_id == user_id)
            .cloned())
    }

    async fn find_by_enrollment_token(&self, token: Uuid) -> AppResult<Option<Account>> {
        Ok(self
            .tables
            .read()
            .await
            .accounts
            .values()
            .find(|a| a.enrollment_token == token)
            .cloned())
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn create(&self, data: &CreateCompany) -> AppResult<Company> {
        if data.people < 1 {
            return Err(AppError::validation("people must be at least 1"));
        }
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&data.account_id) {
            return Err(AppError::database(format!(
                "Company references missing account {}",
                data.account_id
            )));
        }

        let company = Company {
            id: Uuid::now_v7(),
            account_id: data.account_id,
            title: data.title.clone(),
            industry: data.industry,
            role: data.role,
            people: data.people,
            links: Json(data.links.clone()),
            created_at: Utc::now(),
        };
        tables.companies.insert(company.id, company.clone());
        Ok(company)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.companies.remove(&id).is_none() {
            return Ok(false);
        }
        for profile in tables.profiles.values_mut() {
            if profile.company_id == Some(id) {
                profile.company_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn create(&self, data: &CreateProfile) -> AppResult<Profile> {
        let mut tables = self.tables.write().await;
        if tables.profiles.contains_key(&data.id)
            || tables
                .profiles
                .values()
                .any(|p| p.account_id == data.account_id)
        {
            return Err(AppError::conflict("Profile already exists for this account"));
        }

        let now = Utc::now();
        let profile = Profile {
            id: data.id,
            account_id: data.account_id,
            company_id: data.company_id,
            name: data.name.clone(),
            email: data.email.clone(),
            phone: None,
            created_at: now,
            updated_at: now,
        };
        tables.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>> {
        Ok(self.tables.read().await.profiles.get(&id).cloned())
    }
}

#[async_trait]
impl RevocationStore for MemoryStore {
    async fn insert(
        &self,
        token_hash: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let key = (token_hash.to_string(), user_id);
        if tables.revocations.contains_key(&key) {
            return Ok(false);
        }
        tables.revocations.insert(
            key,
            RevocationEntry {
                token_hash: token_hash.to_string(),
                user_id,
                revoked_at: Utc::now(),
                expires_at,
            },
        );
        Ok(true)
    }

    async fn exists(&self, token_hash: &str, user_id: Uuid) -> AppResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .revocations
            .contains_key(&(token_hash.to_string(), user_id)))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.revocations.len();
        tables.revocations.retain(|_, entry| entry.expires_at >= now);
        Ok((before - tables.revocations.len()) as u64)
    }
}

#[async_trait]
impl MailProfileStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<MailProfile>> {
        let mut profiles = self.tables.read().await.mail_profiles.clone();
        profiles.sort_by(|a, b| b.is_active.cmp(&a.is_active).then(a.name.cmp(&b.name)));
        Ok(profiles)
    }
}
