//! Mail body rendering.

use haberdash::money::format_inr;

use crate::domain::orders::models::Order;

use super::MailError;

/// Render the order-confirmation HTML body.
///
/// # Errors
///
/// - [`MailError::Render`] when an amount overflows or cannot be formatted.
pub fn confirmation_html(order: &Order) -> Result<String, MailError> {
    let mut body = String::new();

    body.push_str("<h1>Thanks for your order!</h1>\n");
    body.push_str(&format!(
        "<p>Your order <strong>{}</strong> has been confirmed and is being prepared.</p>\n",
        escape(&order.order_number)
    ));
    body.push_str("<ul>\n");

    for item in &order.items {
        let line_amount = item
            .unit_price
            .checked_mul(u64::from(item.quantity))
            .ok_or(MailError::Render)?;

        let line_total = format_inr(line_amount).map_err(|_overflow| MailError::Render)?;

        body.push_str(&format!(
            "<li>{} × {}: {line_total}</li>\n",
            item.quantity,
            escape(&item.name)
        ));
    }

    body.push_str("</ul>\n");

    let total = format_inr(order.total_amount).map_err(|_overflow| MailError::Render)?;

    body.push_str(&format!("<p>Order total: <strong>{total}</strong></p>\n"));

    if let Some(address) = &order.shipping_address {
        body.push_str(&format!(
            "<p>Shipping to: {}, {}, {} {}</p>\n",
            escape(&address.recipient),
            escape(&address.city),
            escape(&address.state),
            escape(&address.postal_code)
        ));
    }

    Ok(body)
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
