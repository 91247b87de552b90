use std::time::Duration;

use anyhow::{anyhow, Result};
use checkout_engine::db_types::{OrderId, OrderItem};
use clap::{Args, Parser, Subcommand};
use cko_common::{format_amount, Amount, Secret, DEFAULT_CURRENCY_SYMBOL};
use indicatif::{ProgressBar, ProgressStyle};
use url::Url;

mod cart;
mod client;
mod formatting;
mod poller;

use crate::{
    cart::CartStore,
    client::CheckoutClient,
    formatting::{format_cart, format_order_created, format_orders},
    poller::{PollOutcome, PollerConfig, StatusPoller},
};

#[derive(Parser, Debug)]
#[command(version, about = "Storefront client for the checkout server")]
pub struct Arguments {
    /// The checkout server
    #[arg(short, long, env = "CKO_SERVER_URL", default_value = "http://127.0.0.1:3000")]
    server: Url,
    /// Bearer token identifying the buyer
    #[arg(short, long, env = "CKO_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Currency symbol used when printing amounts
    #[arg(long, env = "CKO_CURRENCY_SYMBOL", default_value = DEFAULT_CURRENCY_SYMBOL)]
    currency: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the local cart
    #[command(subcommand)]
    Cart(CartCommand),
    /// Submit the cart and wait for the payment to be approved
    Checkout(WatchParams),
    /// Print the status of an order
    Status { order_id: OrderId },
    /// Poll an order until it is paid
    Watch {
        order_id: OrderId,
        #[command(flatten)]
        params: WatchParams,
    },
    /// List your orders, newest first
    Orders,
    /// Check that the server is up
    Health,
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Put an item in the cart, replacing what is there
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        price: f64,
        #[arg(short, long, default_value = "1")]
        quantity: u32,
    },
    Show,
    Clear,
}

#[derive(Debug, Args)]
pub struct WatchParams {
    /// Seconds between status reads
    #[arg(short, long, default_value = "5")]
    interval: u64,
    /// Stop after this many reads
    #[arg(short, long, default_value = "120")]
    max_attempts: u32,
}

impl WatchParams {
    fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_secs(self.interval.max(1)),
            max_attempts: self.max_attempts,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();
    let cli = Arguments::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Arguments) -> Result<()> {
    let store = CartStore::default_location()?;
    let client = CheckoutClient::new(cli.server, cli.token.map(Secret::new))?;
    let currency = cli.currency;
    match cli.command {
        Command::Cart(cmd) => handle_cart_command(cmd, &store, &currency)?,
        Command::Checkout(params) => checkout(&client, &store, &params).await?,
        Command::Status { order_id } => println!("{}", client.order_status(&order_id).await?),
        Command::Watch { order_id, params } => watch(&client, &store, &order_id, &params).await?,
        Command::Orders => print!("{}", format_orders(&client.my_orders().await?, &currency)),
        Command::Health => print!("{}", client.health().await?),
    }
    Ok(())
}

fn handle_cart_command(cmd: CartCommand, store: &CartStore, currency: &str) -> Result<()> {
    match cmd {
        CartCommand::Add { name, price, quantity } => {
            if quantity == 0 {
                return Err(anyhow!("The quantity must be at least 1"));
            }
            let price = Amount::try_from(price)?;
            let mut cart = store.load()?;
            if let Some(old) = cart.add(OrderItem::new(name, quantity, price)) {
                println!("Replaced {} in the cart", old.name);
            }
            store.save(&cart)?;
            println!("Cart total: {}", format_amount(cart.total(), currency));
        },
        CartCommand::Show => print!("{}", format_cart(&store.load()?, currency)?),
        CartCommand::Clear => store.clear()?,
    }
    Ok(())
}

async fn checkout(client: &CheckoutClient, store: &CartStore, params: &WatchParams) -> Result<()> {
    let request = store.load()?.checkout_request()?;
    let response = client.create_payment(&request).await?;
    print!("{}", format_order_created(&response)?);
    watch(client, store, &response.order_id, params).await
}

async fn watch(client: &CheckoutClient, store: &CartStore, order_id: &OrderId, params: &WatchParams) -> Result<()> {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:5} {msg} [{elapsed}]") {
        pb.set_style(style.tick_strings(&["🕛 ", "🕐 ", "🕑 ", "🕒 ", "🕓 ", "🕔 ", "🕕 ", "🕖 ", "🕗 ", "🕘 ", "🕙 ", "🕚 "]));
    }
    pb.set_message(format!("Waiting for payment approval of order {order_id}..."));
    let mut poller = StatusPoller::new(client, params.poller_config());
    let mut cart_error = None;
    let outcome = poller
        .run(order_id, |_| {
            cart_error = store.clear().err();
        })
        .await;
    match outcome {
        PollOutcome::Paid(id) => {
            pb.finish_with_message("Payment approved!");
            if let Some(e) = cart_error {
                eprintln!("Could not clear the cart. {e}");
            }
            println!("{}", client.success_url(&id)?);
            Ok(())
        },
        PollOutcome::GaveUp { attempts } => {
            pb.finish_with_message("Gave up");
            Err(anyhow!("Order {order_id} was still not paid after {attempts} status checks"))
        },
    }
}
