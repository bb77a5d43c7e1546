//! Random one-time password generation.

use rand::Rng;
use rand::distr::Alphanumeric;

use account_core::config::enrollment::MIN_PASSWORD_LENGTH;

/// Generate an alphanumeric password of at least [`MIN_PASSWORD_LENGTH`] characters.
///
/// The result always contains an upper-case letter, a lower-case letter and
/// a digit.
pub fn generate_password(length: usize) -> String {
    let length = length.max(MIN_PASSWORD_LENGTH);
    let mut rng = rand::rng();

    loop {
        let candidate: String = (&mut rng)
            .sample_iter(Alphanumeric)
            .take(length)
            .map(char::from)
            .collect();

        if is_mixed(&candidate) {
            return candidate;
        }
    }
}

fn is_mixed(candidate: &str) -> bool {
    candidate.bytes().any(|b| b.is_ascii_uppercase())
        && candidate.bytes().any(|b| b.is_ascii_lowercase())
        && candidate.bytes().any(|b| b.is_ascii_digit())
}
