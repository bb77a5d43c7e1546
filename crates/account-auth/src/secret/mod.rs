//! One-time enrollment passwords.

pub mod generator;
pub mod store;

pub use generator::generate_password;
pub use store::{EnrollmentSecretStore, SecretCheck};
