//! Enrollment handshake: registration, out-of-band secret delivery, confirmation.

pub mod message;
pub mod service;

pub use service::{Confirmation, Confirmed, EnrollmentService, Registered, Registration};
