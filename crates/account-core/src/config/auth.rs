//! Token signing, session cookie, and CSRF configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Minimum accepted length of a signing secret, in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Token signing and session configuration.
///
/// The two secrets are never defaulted; they must come from a config file
/// or the environment.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret for access tokens.
    #[serde(default)]
    pub access_token_secret: String,
    /// HMAC-SHA256 secret for refresh tokens. Must differ from the access secret.
    #[serde(default)]
    pub refresh_token_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: i64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_hours: i64,
    /// Name of the HTTP-only cookie carrying the refresh token.
    #[serde(default = "default_refresh_cookie")]
    pub refresh_cookie_name: String,
    /// `Domain` attribute for session cookies. Unset means host-only.
    #[serde(default)]
    pub cookie_domain: Option<String>,
    /// Whether session cookies carry the `Secure` attribute.
    #[serde(default)]
    pub cookie_secure: bool,
    /// Require the account password on token login.
    #[serde(default)]
    pub require_password_on_login: bool,
    /// How often expired revocation entries are purged, in minutes.
    #[serde(default = "default_purge_interval")]
    pub revocation_purge_interval_minutes: u64,
}

impl AuthConfig {
    /// Check that both secrets are present, long enough, and distinct.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.access_token_secret.len() < MIN_SECRET_LENGTH {
            return Err(AppError::configuration(format!(
                "auth.access_token_secret must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }
        if self.refresh_token_secret.len() < MIN_SECRET_LENGTH {
            return Err(AppError::configuration(format!(
                "auth.refresh_token_secret must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }
        if self.access_token_secret == self.refresh_token_secret {
            return Err(AppError::configuration(
                "auth.access_token_secret and auth.refresh_token_secret must differ",
            ));
        }
        if self.access_ttl_minutes <= 0 || self.refresh_ttl_hours <= 0 {
            return Err(AppError::configuration("token TTLs must be positive"));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: String::new(),
            refresh_token_secret: String::new(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_hours: default_refresh_ttl(),
            refresh_cookie_name: default_refresh_cookie(),
            cookie_domain: None,
            cookie_secure: false,
            require_password_on_login: false,
            revocation_purge_interval_minutes: default_purge_interval(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_secret", &"[REDACTED]")
            .field("refresh_token_secret", &"[REDACTED]")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_hours", &self.refresh_ttl_hours)
            .field("refresh_cookie_name", &self.refresh_cookie_name)
            .field("cookie_domain", &self.cookie_domain)
            .field("cookie_secure", &self.cookie_secure)
            .field("require_password_on_login", &self.require_password_on_login)
            .finish()
    }
}

/// CSRF double-submit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfConfig {
    /// Name of the cookie carrying the CSRF token.
    #[serde(default = "default_csrf_cookie")]
    pub cookie_name: String,
    /// Name of the request header that must echo the cookie value.
    #[serde(default = "default_csrf_header")]
    pub header_name: String,
    /// Origins allowed to send unsafe requests. Empty disables the origin check.
    #[serde(default)]
    pub trusted_origins: Vec<String>,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_csrf_cookie(),
            header_name: default_csrf_header(),
            trusted_origins: Vec::new(),
        }
    }
}

fn default_access_ttl() -> i64 {
    5
}

fn default_refresh_ttl() -> i64 {
    24 * 7
}

fn default_refresh_cookie() -> String {
    "refreshtoken".to_string()
}

fn default_purge_interval() -> u64 {
    60
}

fn default_csrf_cookie() -> String {
    "csrftoken".to_string()
}

fn default_csrf_header() -> String {
    "x-csrftoken".to_string()
}
