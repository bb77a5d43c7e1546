//! Session lifecycle manager: login, refresh, logout, and bearer authentication.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use account_core::config::auth::AuthConfig;
use account_core::error::AppError;
use account_core::result::AppResult;
use account_database::repositories::{AccountStore, UserStore};
use account_entity::account::Account;
use account_entity::user::User;

use crate::jwt::{IssuedToken, TokenCodec, TokenError};
use crate::ledger::RevocationLedger;
use crate::password::PasswordHasher;

/// Detail for a refresh request without the refresh cookie.
pub const MISSING_CREDENTIALS: &str = "Authentication credentials were not provided.";

/// Access and refresh token issued together.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access: IssuedToken,
    /// Long-lived refresh token. Travels only in the HTTP-only cookie.
    pub refresh: IssuedToken,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// Generated token pair.
    pub tokens: TokenPair,
    /// The authenticated user.
    pub user: User,
    /// The user's account.
    pub account: Account,
}

/// A refresh token that passed verification and the revocation check.
#[derive(Debug, Clone)]
pub struct RefreshSession {
    /// Subject of the refresh token.
    pub user_id: Uuid,
    /// The raw refresh token, needed to revoke it.
    pub token: String,
    /// When the refresh token expires.
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Manages the session lifecycle over the two token codecs and the ledger.
#[derive(Clone)]
pub struct SessionManager {
    access_codec: Arc<TokenCodec>,
    refresh_codec: Arc<TokenCodec>,
    users: Arc<dyn UserStore>,
    accounts: Arc<dyn AccountStore>,
    ledger: Arc<RevocationLedger>,
    password_hasher: Arc<PasswordHasher>,
    auth_config: AuthConfig,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("auth_config", &self.auth_config)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a session manager. Token codecs are built from `auth_config`.
    pub fn new(
        auth_config: AuthConfig,
        users: Arc<dyn UserStore>,
        accounts: Arc<dyn AccountStore>,
        ledger: Arc<RevocationLedger>,
        password_hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            access_codec: Arc::new(TokenCodec::access(&auth_config)),
            refresh_codec: Arc::new(TokenCodec::refresh(&auth_config)),
            users,
            accounts,
            ledger,
            password_hasher,
            auth_config,
        }
    }

    /// Auth configuration in effect.
    pub fn config(&self) -> &AuthConfig {
        &self.auth_config
    }

    /// Performs the login flow:
    ///
    /// 1. Find the user by username
    /// 2. Verify the password when the policy requires it
    /// 3. Load the user's account
    /// 4. Issue an access + refresh token pair
    pub async fn login(&self, username: &str, password: Option<&str>) -> AppResult<LoginResult> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User '{username}' not found")))?;

        if self.auth_config.require_password_on_login {
            let password =
                password.ok_or_else(|| AppError::validation("Password is required"))?;
            if !self
                .password_hasher
                .verify_password(password, &user.password_hash)?
            {
                warn!(user_id = %user.id, "Login rejected: wrong password");
                return Err(AppError::authentication("Invalid username or password"));
            }
        }

        let account = self
            .accounts
            .find_by_user_id(user.id)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))?;

        let tokens = self.establish(user.id)?;

        info!(user_id = %user.id, account_id = %account.id, "User logged in");

        Ok(LoginResult {
            tokens,
            user,
            account,
        })
    }

    /// Issue a fresh token pair for `user_id`.
    pub fn establish(&self, user_id: Uuid) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access: self.access_codec.issue(user_id)?,
            refresh: self.refresh_codec.issue(user_id)?,
        })
    }

    /// Verify a bearer access token and load its user.
    pub async fn authenticate(&self, access_token: &str) -> AppResult<User> {
        let claims = self.access_codec.verify(access_token).map_err(|e| match e {
            TokenError::Expired => AppError::authentication("access_token expired"),
            TokenError::Malformed => AppError::authentication("Invalid access token"),
        })?;

        self.users
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| AppError::authentication("User not found"))
    }

    /// Check a refresh token from the cookie: present, valid, and not revoked.
    pub async fn validate_refresh(&self, token: Option<&str>) -> AppResult<RefreshSession> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication(MISSING_CREDENTIALS))?;

        let claims = self.refresh_codec.verify(token).map_err(|e| match e {
            TokenError::Expired => {
                AppError::authentication("expired refresh token, please login again.")
            }
            TokenError::Malformed => AppError::authentication("Invalid refresh token"),
        })?;

        if self.ledger.is_revoked(claims.user_id(), token).await? {
            warn!(user_id = %claims.user_id(), "Revoked refresh token presented");
            return Err(AppError::authentication("Refresh token has been revoked"));
        }

        Ok(RefreshSession {
            user_id: claims.user_id(),
            token: token.to_string(),
            expires_at: claims.expires_at(),
        })
    }

    /// Mint a new access token for the subject of a validated refresh session.
    pub async fn refresh(&self, session: &RefreshSession) -> AppResult<IssuedToken> {
        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| AppError::authentication("User not found"))?;

        let access = self.access_codec.issue(user.id)?;
        info!(user_id = %user.id, "Access token refreshed");
        Ok(access)
    }

    /// Revoke the refresh token of a validated session.
    pub async fn logout(&self, session: &RefreshSession) -> AppResult<()> {
        self.ledger
            .revoke(session.user_id, &session.token, session.expires_at)
            .await?;
        info!(user_id = %session.user_id, "Logout completed");
        Ok(())
    }

    /// Load the account owned by `user_id`.
    pub async fn account_for(&self, user_id: Uuid) -> AppResult<Account> {
        self.accounts
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))
    }
}
