/// The direct message sent to a buyer once their payment has been approved.
pub fn buyer_message(item_name: &str, store_name: &str) -> String {
    format!(
        "🎉 Hello! Your payment for **{item_name}** was approved!\n\nTo receive your purchase, please open a support \
         ticket on our server and a member of the team will deliver it.\n\nThank you for shopping at {store_name}!"
    )
}
