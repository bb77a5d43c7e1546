//! Outbound mail: notifier backends and the background dispatch queue.

pub mod dispatcher;
pub mod notifier;

pub use dispatcher::MailDispatcher;
pub use notifier::{HttpRelayNotifier, LogNotifier, MailMessage, MailPriority, Notifier};
