//! Cache key builders for all account service cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

/// Namespace applied to all account service cache keys.
const PREFIX: &str = "acct";

/// Cache key for the one-time enrollment password of a username.
///
/// Usernames are case-sensitive, so the key keeps the original case.
pub fn enrollment_secret(username: &str) -> String {
    format!("{PREFIX}:enroll:secret:{username}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrollment_secret_key() {
        assert_eq!(enrollment_secret("Yuri08"), "acct:enroll:secret:Yuri08");
        assert_ne!(enrollment_secret("Yuri08"), enrollment_secret("yuri08"));
    }
}
