use checkout_engine::{
    db_types::{OrderItem, OrderStatusType},
    order_objects::CheckoutRequest,
    OrderFlowError,
};
use cko_common::{amounts_match, Amount};
use cucumber::{then, when};

use crate::cucumber::CheckoutWorld;

fn cart(quantity: u32, name: String, price: f64, total: f64) -> CheckoutRequest {
    let price = Amount::try_from(price).expect("Invalid price");
    let total = Amount::try_from(total).expect("Invalid total");
    CheckoutRequest::new(vec![OrderItem::new(name, quantity, price)], total)
}

#[when(expr = "{string} checks out {int} {string} at {float} with a total of {float}")]
async fn check_out(world: &mut CheckoutWorld, user: String, quantity: u32, item: String, price: f64, total: f64) {
    let user_id = world.user(&user).id.clone();
    let order =
        world.system().orders.create_order(&user_id, cart(quantity, item, price, total)).await.expect("Checkout failed");
    world.last_order = Some(order);
}

#[when(expr = "{string} tries to check out {int} {string} at {float} with a total of {float}")]
async fn try_check_out(world: &mut CheckoutWorld, user: String, quantity: u32, item: String, price: f64, total: f64) {
    let user_id = world.user(&user).id.clone();
    match world.system().orders.create_order(&user_id, cart(quantity, item, price, total)).await {
        Ok(order) => world.last_order = Some(order),
        Err(e) => world.last_error = Some(e),
    }
}

#[then(expr = "the last order has status {string}")]
async fn last_order_status(world: &mut CheckoutWorld, status: String) {
    let order = world.last_order.as_ref().expect("No order has been placed");
    let current = world.system().orders.order_status(&order.id).await.expect("Error fetching status");
    let expected = status.parse::<OrderStatusType>().expect("Invalid status");
    assert_eq!(current, expected);
}

#[then(expr = "{string} has {int} orders")]
async fn order_count(world: &mut CheckoutWorld, user: String, count: usize) {
    let user_id = world.user(&user).id.clone();
    let orders = world.system().accounts.orders_for_user(&user_id).await.expect("Error fetching orders");
    assert_eq!(orders.len(), count);
}

#[then(expr = "the most recent order for {string} has a total of {float} and item {string}")]
async fn most_recent_order(world: &mut CheckoutWorld, user: String, total: f64, item: String) {
    let user_id = world.user(&user).id.clone();
    let orders = world.system().accounts.orders_for_user(&user_id).await.expect("Error fetching orders");
    let order = orders.first().expect("User has no orders");
    assert!(amounts_match(order.total, Amount::try_from(total).unwrap()), "total was {}", order.total);
    assert_eq!(order.headline_item(), item);
}

#[then(expr = "the orders for {string} are {string}")]
async fn order_sequence(world: &mut CheckoutWorld, user: String, items: String) {
    let user_id = world.user(&user).id.clone();
    let orders = world.system().accounts.orders_for_user(&user_id).await.expect("Error fetching orders");
    let actual = orders.iter().map(|o| o.headline_item()).collect::<Vec<_>>().join(", ");
    assert_eq!(actual, items);
}

#[then("the checkout is rejected as invalid")]
async fn rejected(world: &mut CheckoutWorld) {
    assert!(matches!(world.last_error, Some(OrderFlowError::ValidationError(_))), "got {:?}", world.last_error);
}
