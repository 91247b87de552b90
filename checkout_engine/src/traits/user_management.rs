use crate::{
    db_types::{NewUser, User, UserId},
    traits::CheckoutDatabaseError,
};

/// The `UserManagement` trait defines the behaviour for storing users and resolving their contact details.
///
/// Lookups always hit the backend. Callers that need the latest linked chat id must not cache [`User`] records.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Validates and stores a new user. Emails are matched case-insensitively, and both the email and the linked chat
    /// id must be unique when present.
    async fn insert_user(&self, user: NewUser) -> Result<User, CheckoutDatabaseError>;

    async fn fetch_user_by_id(&self, user_id: &UserId) -> Result<Option<User>, CheckoutDatabaseError>;

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, CheckoutDatabaseError>;

    async fn fetch_user_by_discord_id(&self, discord_id: &str) -> Result<Option<User>, CheckoutDatabaseError>;
}
