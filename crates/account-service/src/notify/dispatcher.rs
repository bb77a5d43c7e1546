//! Bounded mail queue drained by a single background worker.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::notifier::{MailMessage, Notifier};

/// Handle for enqueueing outbound mail without waiting on delivery.
///
/// Cloning is cheap; every clone feeds the same worker. The worker stops
/// once all handles are dropped and the queue is drained.
#[derive(Debug, Clone)]
pub struct MailDispatcher {
    sender: mpsc::Sender<MailMessage>,
}

impl MailDispatcher {
    /// Start the worker. Returns the enqueue handle and the worker's join handle.
    pub fn start(
        notifier: Arc<dyn Notifier>,
        capacity: usize,
        send_timeout: Duration,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(notifier, receiver, send_timeout));
        (Self { sender }, worker)
    }

    /// Queue a message. Never blocks; returns `false` if it was dropped.
    pub fn dispatch(&self, message: MailMessage) -> bool {
        match self.sender.try_send(message) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(message)) => {
                warn!(to = ?message.to, subject = %message.subject, "Mail queue full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(message)) => {
                warn!(to = ?message.to, subject = %message.subject, "Mail queue closed, dropping message");
                false
            }
        }
    }
}

async fn run_worker(
    notifier: Arc<dyn Notifier>,
    mut receiver: mpsc::Receiver<MailMessage>,
    send_timeout: Duration,
) {
    info!(backend = notifier.name(), "Mail worker started");

    while let Some(message) = receiver.recv().await {
        match tokio::time::timeout(send_timeout, notifier.send(&message)).await {
            Ok(Ok(())) => {
                debug!(to = ?message.to, subject = %message.subject, "Mail delivered");
            }
            Ok(Err(e)) => {
                error!(to = ?message.to, subject = %message.subject, error = %e, "Mail delivery failed");
            }
            Err(_) => {
                error!(
                    to = ?message.to,
                    subject = %message.subject,
                    timeout_secs = send_timeout.as_secs(),
                    "Mail delivery timed out"
                );
            }
        }
    }

    info!("Mail worker stopped");
}
