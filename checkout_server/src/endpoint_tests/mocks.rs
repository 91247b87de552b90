use checkout_engine::{
    db_types::{NewOrder, NewUser, Order, OrderId, User, UserId},
    traits::{CheckoutDatabase, CheckoutDatabaseError, OrderManagement, UserManagement},
};
use chrono::Utc;
use mockall::mock;

mock! {
    pub CheckoutDb {}
    impl Clone for CheckoutDb {
        fn clone(&self) -> Self;
    }
    impl OrderManagement for CheckoutDb {
        async fn insert_order(&self, order: NewOrder) -> Result<Order, CheckoutDatabaseError>;
        async fn fetch_order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, CheckoutDatabaseError>;
        async fn fetch_orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, CheckoutDatabaseError>;
    }
    impl UserManagement for CheckoutDb {
        async fn insert_user(&self, user: NewUser) -> Result<User, CheckoutDatabaseError>;
        async fn fetch_user_by_id(&self, user_id: &UserId) -> Result<Option<User>, CheckoutDatabaseError>;
        async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, CheckoutDatabaseError>;
        async fn fetch_user_by_discord_id(&self, discord_id: &str) -> Result<Option<User>, CheckoutDatabaseError>;
    }
    impl CheckoutDatabase for CheckoutDb {
        fn url(&self) -> &str;
    }
}

pub fn buyer(id: &UserId) -> User {
    User {
        id: id.clone(),
        email: Some("buyer@example.com".to_string()),
        password_hash: Some("$argon2id$not-a-real-hash".to_string()),
        discord_id: None,
        created_at: Utc::now(),
    }
}

/// What the backend would return after storing `order`.
pub fn stored(order: NewOrder) -> Order {
    Order {
        id: order.id,
        user_id: order.user_id,
        items: order.items,
        total: order.total,
        status: order.status,
        payment_reference: order.payment_reference,
        created_at: order.created_at,
    }
}
