//! Double-submit CSRF guard.
//!
//! The client receives a random token in a readable cookie and must echo it
//! in a request header on every unsafe request. The guard is stateless: it
//! only compares the two values.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use subtle::ConstantTimeEq;
use thiserror::Error;

use account_core::config::auth::CsrfConfig;
use account_core::error::AppError;

/// Random bytes per CSRF token.
pub const CSRF_TOKEN_BYTES: usize = 32;

/// Encoded length of a token (base64url, no padding).
const CSRF_TOKEN_LEN: usize = 43;

/// Methods that never change state and are exempt from the check.
const SAFE_METHODS: [&str; 4] = ["GET", "HEAD", "OPTIONS", "TRACE"];

/// Reason a request failed the CSRF check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsrfRejection {
    /// The `Origin` header names a host outside the trusted list.
    #[error("Origin checking failed - {0} does not match any trusted origins.")]
    UntrustedOrigin(String),
    /// No CSRF cookie on the request.
    #[error("CSRF cookie not set.")]
    MissingCookie,
    /// No CSRF header on the request.
    #[error("CSRF token missing.")]
    MissingToken,
    /// A token is not a well-formed base64url value of the expected length.
    #[error("CSRF token has incorrect format.")]
    MalformedToken,
    /// Cookie and header carry different tokens.
    #[error("CSRF token incorrect.")]
    Mismatch,
}

impl From<CsrfRejection> for AppError {
    fn from(rejection: CsrfRejection) -> Self {
        AppError::authorization(format!("CSRF Failed: {rejection}"))
    }
}

/// The parts of a request the guard inspects.
#[derive(Debug, Clone, Copy)]
pub struct CsrfRequest<'a> {
    /// HTTP method, upper case.
    pub method: &'a str,
    /// Value of the CSRF cookie.
    pub cookie_token: Option<&'a str>,
    /// Value of the CSRF header.
    pub header_token: Option<&'a str>,
    /// Value of the `Origin` header.
    pub origin: Option<&'a str>,
}

/// Stateless double-submit checker.
#[derive(Debug, Clone)]
pub struct CsrfGuard {
    cookie_name: String,
    header_name: String,
    trusted_origins: Vec<String>,
}

impl CsrfGuard {
    /// Build a guard from configuration.
    pub fn new(config: &CsrfConfig) -> Self {
        Self {
            cookie_name: config.cookie_name.clone(),
            header_name: config.header_name.clone(),
            trusted_origins: config
                .trusted_origins
                .iter()
                .map(|o| o.trim_end_matches('/').to_string())
                .collect(),
        }
    }

    /// Name of the cookie carrying the token.
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Name of the header that must echo the token.
    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    /// Generate a fresh random token.
    pub fn generate_token(&self) -> String {
        let mut bytes = [0u8; CSRF_TOKEN_BYTES];
        rand::rng().fill(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Whether `token` has the shape of a token this guard issues.
    pub fn is_valid_token(&self, token: &str) -> bool {
        is_well_formed(token)
    }

    /// Check a request. Safe methods always pass.
    pub fn check(&self, request: &CsrfRequest<'_>) -> Result<(), CsrfRejection> {
        if SAFE_METHODS
            .iter()
            .any(|m| m.eq_ignore_ascii_case(request.method))
        {
            return Ok(());
        }

        if let Some(origin) = request.origin {
            if !self.trusted_origins.is_empty() && !self.is_trusted_origin(origin) {
                return Err(CsrfRejection::UntrustedOrigin(origin.to_string()));
            }
        }

        let cookie = request
            .cookie_token
            .filter(|t| !t.is_empty())
            .ok_or(CsrfRejection::MissingCookie)?;
        let header = request
            .header_token
            .filter(|t| !t.is_empty())
            .ok_or(CsrfRejection::MissingToken)?;

        if !is_well_formed(cookie) || !is_well_formed(header) {
            return Err(CsrfRejection::MalformedToken);
        }

        if bool::from(cookie.as_bytes().ct_eq(header.as_bytes())) {
            Ok(())
        } else {
            Err(CsrfRejection::Mismatch)
        }
    }

    fn is_trusted_origin(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/');
        self.trusted_origins
            .iter()
            .any(|trusted| trusted.eq_ignore_ascii_case(origin))
    }
}

fn is_well_formed(token: &str) -> bool {
    token.len() == CSRF_TOKEN_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
