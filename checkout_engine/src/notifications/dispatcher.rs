use std::fmt::Display;

use log::*;

use crate::{
    db_types::{Order, User},
    notifications::buyer_message,
    traits::{AdminNotifier, DirectMessenger, NotificationError, SaleNotice, UserManagement},
};

/// The result of a single delivery attempt.
#[derive(Debug, Clone)]
pub enum ChannelOutcome {
    Delivered,
    /// Nothing was sent, and that is not a failure (e.g. the channel is not configured).
    Skipped(String),
    Failed(NotificationError),
}

impl ChannelOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, ChannelOutcome::Delivered)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ChannelOutcome::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ChannelOutcome::Failed(_))
    }
}

impl Display for ChannelOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelOutcome::Delivered => write!(f, "delivered"),
            ChannelOutcome::Skipped(reason) => write!(f, "skipped ({reason})"),
            ChannelOutcome::Failed(e) => write!(f, "failed ({e})"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub admin: ChannelOutcome,
    pub buyer: ChannelOutcome,
}

/// Sends the sale summary and the buyer's direct message for new orders.
///
/// The two sends run one after the other and do not affect each other: the buyer message is attempted whatever
/// happened to the admin notice. The order itself is never modified.
#[derive(Clone)]
pub struct NotificationDispatcher<B, A, D> {
    db: B,
    admin: Option<A>,
    buyer: Option<D>,
    store_name: String,
}

impl<B, A, D> NotificationDispatcher<B, A, D>
where
    B: UserManagement,
    A: AdminNotifier,
    D: DirectMessenger,
{
    pub fn new<S: Into<String>>(db: B, admin: Option<A>, buyer: Option<D>, store_name: S) -> Self {
        Self { db, admin, buyer, store_name: store_name.into() }
    }

    pub async fn dispatch(&self, order: &Order) -> DispatchReport {
        debug!("📣️ Dispatching notifications for order [{}]", order.id);
        // Always read the owner from the store. The chat account may have been linked after the order was placed.
        let owner = self.db.fetch_user_by_id(&order.user_id).await.map_err(|e| {
            warn!("📣️ Could not look up the owner of order [{}]. {e}", order.id);
            NotificationError::OwnerLookupFailed(e.to_string())
        });
        let admin = self.notify_admin(order, owner.as_ref().ok().and_then(Option::as_ref)).await;
        let buyer = self.notify_buyer(order, owner).await;
        info!("📣️ Notifications for order [{}]. Admin: {admin}. Buyer: {buyer}", order.id);
        DispatchReport { admin, buyer }
    }

    async fn notify_admin(&self, order: &Order, owner: Option<&User>) -> ChannelOutcome {
        let Some(channel) = &self.admin else {
            return ChannelOutcome::Skipped("no admin channel is configured".into());
        };
        let notice = SaleNotice::new(order, owner);
        match channel.notify_sale(&notice).await {
            Ok(()) => {
                debug!("📣️ Sale notice for order [{}] delivered", order.id);
                ChannelOutcome::Delivered
            },
            Err(e) => {
                warn!("📣️ Could not deliver the sale notice for order [{}]. {e}", order.id);
                ChannelOutcome::Failed(e)
            },
        }
    }

    async fn notify_buyer(&self, order: &Order, owner: Result<Option<User>, NotificationError>) -> ChannelOutcome {
        let owner = match owner {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("📣️ The owner of order [{}] ({}) no longer exists", order.id, order.user_id);
                return ChannelOutcome::Skipped("the order owner does not exist".into());
            },
            Err(e) => return ChannelOutcome::Failed(e),
        };
        let Some(discord_id) = owner.discord_id.as_deref() else {
            trace!("📣️ User {} has not linked a chat account. No direct message will be sent.", owner.id);
            return ChannelOutcome::Skipped("the buyer has no linked chat account".into());
        };
        let Some(channel) = &self.buyer else {
            return ChannelOutcome::Skipped("no direct message channel is configured".into());
        };
        let text = buyer_message(order.headline_item(), &self.store_name);
        match channel.send_direct_message(discord_id, &text).await {
            Ok(()) => {
                debug!("📣️ Direct message for order [{}] sent to {discord_id}", order.id);
                ChannelOutcome::Delivered
            },
            Err(e) => {
                warn!("📣️ Could not send the direct message for order [{}] to {discord_id}. {e}", order.id);
                ChannelOutcome::Failed(e)
            },
        }
    }
}
