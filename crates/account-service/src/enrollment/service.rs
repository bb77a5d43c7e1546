//! Registration and confirmation of new accounts.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use account_auth::password::PasswordHasher;
use account_auth::secret::{EnrollmentSecretStore, SecretCheck, generate_password};
use account_auth::session::{SessionManager, TokenPair};
use account_core::config::enrollment::EnrollmentConfig;
use account_core::error::AppError;
use account_core::result::AppResult;
use account_database::Stores;
use account_database::repositories::{AccountStore, CompanyStore, ProfileStore, UserStore};
use account_entity::account::{Account, AccountView, CreateAccount};
use account_entity::company::{CompanyLinks, CompanyRole, CreateCompany, Industry};
use account_entity::profile::{CreateProfile, Profile};
use account_entity::user::{CreateUser, User, UserView};

use super::message;
use crate::notify::MailDispatcher;

/// Detail returned for any failed one-time password check.
pub const INVALID_SECRET: &str = "Invalid credentials or one-time password";

/// Input to [`EnrollmentService::register`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    /// Requested username.
    pub username: String,
    /// Contact email; receives the confirmation link.
    pub email: String,
}

/// Outcome of a registration.
#[derive(Debug, Clone, Serialize)]
pub struct Registered {
    /// The new account.
    pub account: AccountView,
    /// Public view of the new user.
    pub user: UserView,
}

/// Company details and the one-time password submitted at confirmation.
#[derive(Debug, Clone, Deserialize)]
pub struct Confirmation {
    /// Company name.
    pub title: String,
    /// Industry.
    pub industry: Industry,
    /// The user's role in the company.
    pub role: CompanyRole,
    /// Headcount, at least one.
    pub people: i32,
    /// Social links.
    pub links: CompanyLinks,
    /// One-time password from the enrollment mail.
    pub password: String,
}

/// Outcome of a confirmation.
#[derive(Debug, Clone)]
pub struct Confirmed {
    /// Session issued for the confirmed user.
    pub tokens: TokenPair,
    /// The created profile.
    pub profile: Profile,
}

/// Drives the `Registered -> Confirmed` enrollment handshake.
#[derive(Debug, Clone)]
pub struct EnrollmentService {
    users: Arc<dyn UserStore>,
    accounts: Arc<dyn AccountStore>,
    companies: Arc<dyn CompanyStore>,
    profiles: Arc<dyn ProfileStore>,
    secrets: Arc<EnrollmentSecretStore>,
    hasher: Arc<PasswordHasher>,
    sessions: Arc<SessionManager>,
    mailer: MailDispatcher,
    config: EnrollmentConfig,
}

impl EnrollmentService {
    /// Creates a new enrollment service.
    pub fn new(
        stores: &Stores,
        secrets: Arc<EnrollmentSecretStore>,
        hasher: Arc<PasswordHasher>,
        sessions: Arc<SessionManager>,
        mailer: MailDispatcher,
        config: EnrollmentConfig,
    ) -> Self {
        Self {
            users: stores.users.clone(),
            accounts: stores.accounts.clone(),
            companies: stores.companies.clone(),
            profiles: stores.profiles.clone(),
            secrets,
            hasher,
            sessions,
            mailer,
            config,
        }
    }

    /// Register a user and account, store a one-time password, and mail it out.
    ///
    /// Partial writes are rolled back if any step after user creation fails.
    /// Mail delivery happens in the background and never fails the call.
    pub async fn register(&self, input: &Registration) -> AppResult<Registered> {
        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(AppError::conflict(
                "A user with that username already exists.",
            ));
        }
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("A user with that email already exists."));
        }

        let user = self
            .users
            .create(&CreateUser {
                username: input.username.clone(),
                email: input.email.clone(),
                password_hash: self.hasher.unusable(),
            })
            .await?;

        let (account, password) = match self.provision(&user).await {
            Ok(provisioned) => provisioned,
            Err(e) => {
                self.roll_back(&user).await;
                return Err(e);
            }
        };

        let mail = message::compose(
            &self.config.domain,
            &user.username,
            &user.email,
            account.enrollment_token,
            &password,
        );
        self.mailer.dispatch(mail);

        info!(user_id = %user.id, account_id = %account.id, username = %user.username, "User registered");

        Ok(Registered {
            account: account.view(),
            user: user.view(),
        })
    }

    async fn provision(&self, user: &User) -> AppResult<(Account, String)> {
        let account = self
            .accounts
            .create(&CreateAccount {
                user_id: user.id,
                enrollment_token: Uuid::new_v4(),
                is_admin: false,
            })
            .await?;

        let password = generate_password(self.config.password_length);
        self.secrets.put(&user.username, &password).await?;

        let hash = self.hasher.hash_password(&password)?;
        self.users.set_password_hash(user.id, &hash).await?;

        Ok((account, password))
    }

    async fn roll_back(&self, user: &User) {
        if let Err(e) = self.secrets.discard(&user.username).await {
            error!(user_id = %user.id, username = %user.username, error = %e, "Failed to discard enrollment secret during rollback");
        }

        match self.users.delete(user.id).await {
            Ok(_) => warn!(user_id = %user.id, username = %user.username, "Registration rolled back"),
            Err(e) => error!(
                user_id = %user.id,
                username = %user.username,
                error = %e,
                "Registration rollback failed, manual cleanup required"
            ),
        }
    }

    /// Confirm an enrollment: check the one-time password, create the company
    /// and profile, and open a session.
    pub async fn confirm(
        &self,
        email: &str,
        enrollment_token: Uuid,
        input: &Confirmation,
    ) -> AppResult<Confirmed> {
        if input.title.trim().is_empty() {
            return Err(AppError::validation("title: This field may not be blank."));
        }
        if input.people < 1 {
            return Err(AppError::validation(
                "people: Ensure this value is greater than or equal to 1.",
            ));
        }

        let account = self
            .accounts
            .find_by_enrollment_token(enrollment_token)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))?;

        let user = self
            .users
            .find_by_id(account.user_id)
            .await?
            .filter(|u| u.email == email)
            .ok_or_else(|| AppError::not_found("Account not found"))?;

        match self.secrets.consume(&user.username, &input.password).await? {
            SecretCheck::Consumed => {}
            SecretCheck::Missing | SecretCheck::Mismatch => {
                warn!(user_id = %user.id, "Enrollment confirmation rejected");
                return Err(AppError::authentication(INVALID_SECRET));
            }
        }

        let company = self
            .companies
            .create(&CreateCompany {
                account_id: account.id,
                title: input.title.trim().to_string(),
                industry: input.industry,
                role: input.role,
                people: input.people,
                links: input.links.clone(),
            })
            .await?;

        let profile = match self
            .profiles
            .create(&CreateProfile {
                id: enrollment_token,
                account_id: account.id,
                company_id: Some(company.id),
                name: user.username.clone(),
                email: email.to_string(),
            })
            .await
        {
            Ok(profile) => profile,
            Err(e) => {
                if let Err(cleanup) = self.companies.delete(company.id).await {
                    error!(company_id = %company.id, error = %cleanup, "Failed to remove company after profile creation failed");
                }
                error!(user_id = %user.id, error = %e, "Profile creation failed during confirmation");
                return Err(e);
            }
        };

        let tokens = self.sessions.establish(user.id)?;

        info!(user_id = %user.id, profile_id = %profile.id, company_id = %company.id, "Enrollment confirmed");

        Ok(Confirmed { tokens, profile })
    }
}
