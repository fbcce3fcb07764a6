//! Administrator notifications

mod client;

pub use client::ZapiClient;

use crate::error::RelayError;
use async_trait::async_trait;
use tracing::{error, info};

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &str;

    /// Send one plain-text message to one destination
    async fn send_text(&self, destination: &str, message: &str) -> Result<(), RelayError>;
}

/// Send `message` to each recipient in order.
///
/// Stops at the first failure; recipients after it are not contacted and earlier
/// sends are not undone. Returns the number of messages sent.
pub async fn notify_all(
    notifier: &dyn Notifier,
    recipients: &[String],
    message: &str,
) -> Result<usize, RelayError> {
    for (sent, recipient) in recipients.iter().enumerate() {
        if let Err(e) = notifier.send_text(recipient, message).await {
            error!(
                "Notification via {} failed after {} of {} recipients: {}",
                notifier.name(),
                sent,
                recipients.len(),
                e
            );
            return Err(e);
        }
    }

    info!("Notified {} administrators via {}", recipients.len(), notifier.name());
    Ok(recipients.len())
}
