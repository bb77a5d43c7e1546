//! Enrollment handshake configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Shortest one-time password the generator may be configured for.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Registration and confirmation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentConfig {
    /// Public base URL used to build confirmation links, e.g. `https://crm.example.com`.
    #[serde(default)]
    pub domain: String,
    /// Length of the generated one-time password.
    #[serde(default = "default_password_length")]
    pub password_length: usize,
    /// How long an unconfirmed one-time password stays valid, in hours.
    #[serde(default = "default_secret_ttl")]
    pub secret_ttl_hours: u64,
}

impl EnrollmentConfig {
    /// Check the domain is set and the password length is acceptable.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.domain.trim().is_empty() {
            return Err(AppError::configuration("enrollment.domain is required"));
        }
        if self.password_length < MIN_PASSWORD_LENGTH {
            return Err(AppError::configuration(format!(
                "enrollment.password_length must be at least {MIN_PASSWORD_LENGTH}"
            )));
        }
        if self.secret_ttl_hours == 0 {
            return Err(AppError::configuration(
                "enrollment.secret_ttl_hours must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            password_length: default_password_length(),
            secret_ttl_hours: default_secret_ttl(),
        }
    }
}

fn default_password_length() -> usize {
    MIN_PASSWORD_LENGTH
}

fn default_secret_ttl() -> u64 {
    72
}
