//! Enrollment mail composition.

use uuid::Uuid;

use crate::notify::{MailMessage, MailPriority};

/// Subject line of the enrollment mail.
pub const ENROLLMENT_SUBJECT: &str = "Your sign-in details";

/// Confirmation link for an enrollment: `{domain}/signin/{email}/{token}`.
pub fn confirmation_link(domain: &str, email: &str, token: Uuid) -> String {
    format!("{}/signin/{email}/{token}", domain.trim_end_matches('/'))
}

/// Compose the mail carrying the confirmation link and the one-time password.
pub fn compose(
    domain: &str,
    username: &str,
    email: &str,
    token: Uuid,
    password: &str,
) -> MailMessage {
    let link = confirmation_link(domain, email, token);
    let body = format!(
        "<p>Thank you for registering. Your sign-in details:</p>\
         <ul>\
         <li>Login: {username}</li>\
         <li>Account id: {token}</li>\
         <li>One-time password: {password}</li>\
         </ul>\
         <p>To finish signing up, follow the link: <a href=\"{link}\">{link}</a></p>"
    );

    MailMessage {
        to: vec![email.to_string()],
        subject: ENROLLMENT_SUBJECT.to_string(),
        body,
        priority: MailPriority::High,
    }
}
