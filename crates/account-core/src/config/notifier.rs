//! Outbound notification configuration.

use serde::{Deserialize, Serialize};

/// Mail notifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Notifier backend: `"log"` or `"http"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Mail relay endpoint for the `http` backend.
    #[serde(default)]
    pub relay_url: String,
    /// Sender address placed on outgoing messages.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Capacity of the outbound queue. Messages beyond it are dropped and logged.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Upper bound on a single send, in seconds.
    #[serde(default = "default_send_timeout")]
    pub send_timeout_seconds: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            relay_url: String::new(),
            from_address: default_from_address(),
            queue_capacity: default_queue_capacity(),
            send_timeout_seconds: default_send_timeout(),
        }
    }
}

fn default_provider() -> String {
    "log".to_string()
}

fn default_from_address() -> String {
    "no-reply@localhost".to_string()
}

fn default_queue_capacity() -> usize {
    256
}

fn default_send_timeout() -> u64 {
    30
}
