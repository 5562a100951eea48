use async_trait::async_trait;
use tracing::{debug, error};

use crate::services::telegram::DeliveryError;

/// Transport that carries a plain-text message to the configured recipient.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), DeliveryError>;
}

/// What happened to a notification. Never an error for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Failed,
}

/// Sends notifications and swallows transport failures after logging them.
pub struct Notifier<M> {
    messenger: M,
}

impl<M: Messenger> Notifier<M> {
    pub fn new(messenger: M) -> Self {
        Self { messenger }
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    pub async fn notify(&self, text: &str) -> Delivery {
        match self.messenger.send(text).await {
            Ok(()) => {
                debug!(message = %text, "Notification sent");
                metrics::counter!("notifications_sent_total").increment(1);
                Delivery::Sent
            }
            Err(e) => {
                error!(error = %e, message = %text, "Notification was not delivered");
                metrics::counter!("notifications_failed_total").increment(1);
                Delivery::Failed
            }
        }
    }
}
