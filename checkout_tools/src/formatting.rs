use std::fmt::Write;

use anyhow::Result;
use checkout_engine::db_types::{Order, OrderItem};
use checkout_server::data_objects::CreatePaymentResponse;
use cko_common::format_amount;
use prettytable::{
    format::{LinePosition, LineSeparator, TableFormat},
    row,
    Table,
};

use crate::cart::Cart;

fn markdown_format() -> TableFormat {
    prettytable::format::FormatBuilder::new()
        .column_separator('|')
        .borders('|')
        .separator(LinePosition::Title, LineSeparator::new('-', '|', '|', '|'))
        .padding(1, 1)
        .build()
}

fn describe_items(items: &[OrderItem]) -> String {
    items.iter().map(|i| format!("{} x{}", i.name, i.quantity)).collect::<Vec<_>>().join(", ")
}

pub fn format_orders(orders: &[Order], currency: &str) -> String {
    if orders.is_empty() {
        return "You have not placed any orders yet".to_string();
    }
    let mut table = Table::new();
    table.set_titles(row!["Order id", "Items", "Total", "Status", "Payment reference", "Created At"]);
    for order in orders {
        table.add_row(row![
            order.id,
            describe_items(&order.items),
            format_amount(order.total, currency),
            order.status.to_string(),
            order.payment_reference,
            order.created_at.format("%Y-%m-%d %H:%M:%S").to_string()
        ]);
    }
    table.set_format(markdown_format());
    format!("{table}\n")
}

pub fn format_cart(cart: &Cart, currency: &str) -> Result<String> {
    let mut f = String::new();
    match &cart.item {
        None => writeln!(f, "Your cart is empty")?,
        Some(item) => {
            writeln!(f, "{} x{} @ {}", item.name, item.quantity, format_amount(item.price, currency))?;
            writeln!(f, "-----------------------------------------")?;
            writeln!(f, "Total: {}", format_amount(cart.total(), currency))?;
        },
    }
    Ok(f)
}

pub fn format_order_created(response: &CreatePaymentResponse) -> Result<String> {
    let mut f = String::new();
    writeln!(f, "{}", response.message)?;
    writeln!(f, "Order id: {}", response.order_id)?;
    Ok(f)
}
