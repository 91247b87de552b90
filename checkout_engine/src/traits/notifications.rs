use thiserror::Error;

use crate::traits::SaleNotice;

#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("The notification channel rejected the message. {0}")]
    Rejected(String),
    #[error("Could not reach the notification channel. {0}")]
    Unreachable(String),
    #[error("The recipient {0} could not be found on the notification channel")]
    RecipientNotFound(String),
    #[error("Could not look up the order owner. {0}")]
    OwnerLookupFailed(String),
}

/// Delivers sale summaries to the shop administrators (e.g. a chat webhook).
#[allow(async_fn_in_trait)]
pub trait AdminNotifier {
    async fn notify_sale(&self, notice: &SaleNotice) -> Result<(), NotificationError>;
}

/// Sends a private message to a buyer on an external chat platform.
#[allow(async_fn_in_trait)]
pub trait DirectMessenger {
    async fn send_direct_message(&self, external_id: &str, text: &str) -> Result<(), NotificationError>;
}
