//! JWT token validation.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use thiserror::Error;

use super::claims::{Claims, TokenType};

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token's expiry is at or before the current time.
    #[error("token expired")]
    Expired,
    /// Bad structure, bad signature, or a token of the other class.
    #[error("token malformed")]
    Malformed,
}

/// Validates HS256 tokens of one class.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
    token_type: TokenType,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("token_type", &self.token_type)
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Creates a new decoder for `token_type` verified with `secret`.
    pub fn new(token_type: TokenType, secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            token_type,
        }
    }

    /// Token class this decoder accepts.
    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// Decodes and validates a token string.
    ///
    /// Checks, in order: structure and signature, expiry, token class.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?
            .claims;

        // The library accepts `exp == now`; expiry is inclusive here.
        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        if claims.token_type != self.token_type {
            return Err(TokenError::Malformed);
        }

        Ok(claims)
    }
}
