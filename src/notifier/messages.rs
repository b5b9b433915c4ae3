//! Notification texts. User-supplied values are HTML-escaped since
//! messages are sent with HTML parse mode.

use crate::models::{Order, OrderAction, OrderSummary};
use crate::notifier::{OrderKey, OutboundMessage};

/// Escapes the characters the bot API treats as HTML markup.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn order_line(order: &Order) -> String {
    let mut line = format!(
        "👤 {}  ☕ {}",
        escape_html(&order.guest),
        escape_html(&order.coffee)
    );
    if let Some(options) = order.options.as_deref().filter(|o| !o.is_empty()) {
        line.push_str(" with ");
        line.push_str(&escape_html(options));
    }
    line
}

/// Announces a new or updated order, with a "done" button.
#[must_use]
pub fn order_event(action: OrderAction, order: &Order) -> OutboundMessage {
    let headline = match action {
        OrderAction::Created => "🆕 <b>New order!</b>",
        OrderAction::Updated => "✏️ <b>Order updated</b>",
    };
    OutboundMessage::text(format!("{}\n{}", headline, order_line(order)))
        .with_done_action(OrderKey::new(&order.guest, &order.coffee))
}

/// Announces that an order was completed and removed.
#[must_use]
pub fn order_done(order: &Order) -> OutboundMessage {
    OutboundMessage::text(format!("🟢 <b>Done</b>\n{}", order_line(order)))
}

/// Announces that every open order was removed.
#[must_use]
pub fn all_cleared(count: usize) -> OutboundMessage {
    OutboundMessage::text(format!("🟢 <b>All orders cleared</b> ({count})"))
}

/// Lists the number of open orders per drink kind.
#[must_use]
pub fn summary(summary: &OrderSummary) -> OutboundMessage {
    let mut text = String::from("☕ <b>Open orders</b>");
    for (kind, count) in summary.iter() {
        text.push_str(&format!("\n{}: {}", kind, count));
    }
    OutboundMessage::text(text)
}

/// Lists every open order.
#[must_use]
pub fn open_orders(orders: &[Order]) -> OutboundMessage {
    if orders.is_empty() {
        return OutboundMessage::text("No open orders");
    }

    let lines: Vec<String> = orders.iter().map(order_line).collect();
    OutboundMessage::text(lines.join("\n"))
}
