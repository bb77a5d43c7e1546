//! Outbound mail sender profiles.

pub mod model;

pub use model::MailProfile;
