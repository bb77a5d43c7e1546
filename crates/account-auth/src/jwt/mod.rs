//! JWT token encoding, decoding, and claims management.
//!
//! Access and refresh tokens are signed with different secrets. A
//! [`TokenCodec`] pairs the encoder and decoder for one token class.

pub mod claims;
pub mod decoder;
pub mod encoder;

use chrono::Duration;
use uuid::Uuid;

use account_core::config::auth::AuthConfig;
use account_core::error::AppError;

pub use claims::{Claims, TokenType};
pub use decoder::{JwtDecoder, TokenError};
pub use encoder::{IssuedToken, JwtEncoder};

/// Encoder, decoder, and default TTL for one token class.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    ttl: Duration,
}

impl TokenCodec {
    /// Build a codec for `token_type` signed with `secret`.
    pub fn new(token_type: TokenType, secret: &str, ttl: Duration) -> Self {
        Self {
            encoder: JwtEncoder::new(token_type, secret),
            decoder: JwtDecoder::new(token_type, secret),
            ttl,
        }
    }

    /// Access token codec from configuration.
    pub fn access(config: &AuthConfig) -> Self {
        Self::new(
            TokenType::Access,
            &config.access_token_secret,
            Duration::minutes(config.access_ttl_minutes),
        )
    }

    /// Refresh token codec from configuration.
    pub fn refresh(config: &AuthConfig) -> Self {
        Self::new(
            TokenType::Refresh,
            &config.refresh_token_secret,
            Duration::hours(config.refresh_ttl_hours),
        )
    }

    /// Issue a token with the configured TTL.
    pub fn issue(&self, subject: Uuid) -> Result<IssuedToken, AppError> {
        self.encoder.issue(subject, self.ttl)
    }

    /// Issue a token with an explicit TTL.
    pub fn issue_with_ttl(&self, subject: Uuid, ttl: Duration) -> Result<IssuedToken, AppError> {
        self.encoder.issue(subject, ttl)
    }

    /// Verify a token of this codec's class.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.decoder.verify(token)
    }

    /// Token class handled by this codec.
    pub fn token_type(&self) -> TokenType {
        self.decoder.token_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS_SECRET: &str = "access-secret-access-secret-0001";
    const REFRESH_SECRET: &str = "refresh-secret-refresh-secret-01";

    fn access() -> TokenCodec {
        TokenCodec::new(TokenType::Access, ACCESS_SECRET, Duration::minutes(5))
    }

    fn refresh() -> TokenCodec {
        TokenCodec::new(TokenType::Refresh, REFRESH_SECRET, Duration::hours(168))
    }

    #[test]
    fn test_round_trip_returns_subject() {
        let subject = Uuid::now_v7();
        let issued = access().issue(subject).unwrap();
        let claims = access().verify(&issued.token).unwrap();
        assert_eq!(claims.sub, subject);
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn test_zero_ttl_is_expired() {
        let issued = access()
            .issue_with_ttl(Uuid::now_v7(), Duration::zero())
            .unwrap();
        assert_eq!(access().verify(&issued.token), Err(TokenError::Expired));
    }

    #[test]
    fn test_negative_ttl_is_expired() {
        let issued = refresh()
            .issue_with_ttl(Uuid::now_v7(), Duration::seconds(-30))
            .unwrap();
        assert_eq!(refresh().verify(&issued.token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_malformed() {
        let other = TokenCodec::new(
            TokenType::Access,
            "another-secret-another-secret-01",
            Duration::minutes(5),
        );
        let issued = other.issue(Uuid::now_v7()).unwrap();
        assert_eq!(access().verify(&issued.token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_access_token_rejected_by_refresh_codec() {
        let issued = access().issue(Uuid::now_v7()).unwrap();
        assert_eq!(refresh().verify(&issued.token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_same_secret_different_class_is_malformed() {
        let as_refresh = TokenCodec::new(TokenType::Refresh, ACCESS_SECRET, Duration::hours(1));
        let issued = access().issue(Uuid::now_v7()).unwrap();
        assert_eq!(as_refresh.verify(&issued.token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert_eq!(access().verify("not-a-jwt"), Err(TokenError::Malformed));
        assert_eq!(access().verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_tokens_issued_together_differ() {
        let subject = Uuid::now_v7();
        let a = refresh().issue(subject).unwrap();
        let b = refresh().issue(subject).unwrap();
        assert_ne!(a.token, b.token);
    }
}
