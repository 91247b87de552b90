use checkout_engine::{db_types::NewUser, order_objects::TotalPolicy, UserManagement};
use cucumber::given;

use crate::cucumber::{checkout_world::CheckoutSystem, CheckoutWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut CheckoutWorld) {
    let system = CheckoutSystem::new().await;
    world.system = Some(system);
}

#[given("strict totals")]
async fn strict_totals(world: &mut CheckoutWorld) {
    let system = world.system.take().expect("Checkout system not initialised");
    world.system = Some(system.with_total_policy(TotalPolicy::Recompute));
}

#[given(expr = "a user {string} with email {string}")]
async fn user_with_email(world: &mut CheckoutWorld, name: String, email: String) {
    let user = world.system().db.insert_user(NewUser::with_password(email, "hash")).await.expect("Error creating user");
    world.users.insert(name, user);
}

#[given(expr = "a user {string} with discord id {string}")]
async fn user_with_discord(world: &mut CheckoutWorld, name: String, discord_id: String) {
    let user = world.system().db.insert_user(NewUser::with_discord_id(discord_id)).await.expect("Error creating user");
    world.users.insert(name, user);
}
