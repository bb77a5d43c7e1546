//! # account-service
//!
//! Application use cases for the account service. Services orchestrate the
//! store traits, the cache, and the auth primitives.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod enrollment;
pub mod notify;

pub use enrollment::{Confirmation, Confirmed, EnrollmentService, Registered, Registration};
pub use notify::{MailDispatcher, MailMessage, MailPriority, Notifier};
