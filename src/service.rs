//! Order service: validation, store orchestration and notifications.
//!
//! Each operation mutates the store first and only then talks to the
//! notifier, so the response always reflects the stored state no matter what
//! happens to the notification.

use crate::error::ApiError;
use crate::models::{
    ActionResponse, HealthResponse, OrderAction, OrderOptions, PlaceOrderRequest,
    PlaceOrderResponse, StatusResponse,
};
use crate::notifier::{DeliveryReport, OutboundMessage, messages};
use crate::state::AppState;
use crate::store::Upserted;
use chrono::Utc;

#[cfg(test)]
mod tests;

/// A validated order submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderInput {
    /// Trimmed guest name.
    pub guest: String,
    /// Trimmed drink name.
    pub coffee: String,
    /// Options with the boolean flags folded in.
    pub options: Option<String>,
}

impl TryFrom<PlaceOrderRequest> for OrderInput {
    type Error = ApiError;

    fn try_from(request: PlaceOrderRequest) -> Result<Self, Self::Error> {
        let guest = non_blank(request.guest);
        let coffee = non_blank(request.coffee);

        let (Some(guest), Some(coffee)) = (guest, coffee) else {
            return Err(ApiError::InvalidRequest(
                "guest and coffee are required".to_string(),
            ));
        };

        Ok(Self {
            guest,
            coffee,
            options: merge_options(
                request.options.as_ref().and_then(OrderOptions::to_text),
                request.decaf.unwrap_or(false),
                request.oat_milk.unwrap_or(false),
            ),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Folds the `decaf` / `oatMilk` flags into the free-form options text,
/// skipping flags the text already mentions.
fn merge_options(options: Option<String>, decaf: bool, oat_milk: bool) -> Option<String> {
    let mut parts: Vec<String> = non_blank(options).into_iter().collect();
    let mentioned = parts.first().map(|o| o.to_lowercase()).unwrap_or_default();

    if decaf && !mentioned.contains("decaf") {
        parts.push("decaf".to_string());
    }
    if oat_milk && !mentioned.contains("oat") {
        parts.push("oat milk".to_string());
    }

    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Sends an event message followed by the refreshed per-kind summary.
///
/// The summary is only attempted if the event message went through, so an
/// unreachable bot costs a single timeout. Returns the event's report.
async fn notify_with_summary(state: &AppState, event: OutboundMessage) -> DeliveryReport {
    let report = state.notifier.send(event).await;
    if report.sent {
        state
            .notifier
            .send(messages::summary(&state.store.summary()))
            .await;
    }
    report
}

/// Creates a new order or updates the one with the same guest and drink.
///
/// # Errors
/// Returns [`ApiError::InvalidRequest`] if guest or coffee is missing.
pub async fn place_order(
    state: &AppState,
    request: PlaceOrderRequest,
) -> Result<PlaceOrderResponse, ApiError> {
    let input = OrderInput::try_from(request)?;

    let Upserted { order, action } = state
        .store
        .upsert(&input.guest, &input.coffee, input.options);

    let telegram = notify_with_summary(state, messages::order_event(action, &order)).await;

    let message = match action {
        OrderAction::Created => "Order placed",
        OrderAction::Updated => "Order updated",
    };

    Ok(PlaceOrderResponse {
        success: true,
        message: message.to_string(),
        action,
        order,
        telegram,
    })
}

/// Removes one order, e.g. because it was served.
///
/// # Errors
/// Returns [`ApiError::NotFound`] if no order matches.
pub async fn complete_order(
    state: &AppState,
    guest: &str,
    coffee: &str,
) -> Result<ActionResponse, ApiError> {
    let removed = state
        .store
        .remove(guest, coffee)
        .ok_or_else(|| ApiError::NotFound(format!("{} / {}", guest, coffee)))?;

    let telegram = notify_with_summary(state, messages::order_done(&removed)).await;

    Ok(ActionResponse {
        success: true,
        message: "Order deleted".to_string(),
        telegram: Some(telegram),
    })
}

/// Removes every open order. Succeeds on an empty store without side
/// effects.
pub async fn clear_orders(state: &AppState) -> ActionResponse {
    let count = state.store.clear();
    if count == 0 {
        return ActionResponse {
            success: true,
            message: "No open orders".to_string(),
            telegram: None,
        };
    }

    let telegram = notify_with_summary(state, messages::all_cleared(count)).await;

    ActionResponse {
        success: true,
        message: format!("All {} orders deleted", count),
        telegram: Some(telegram),
    }
}

/// Current orders with per-kind counts.
#[must_use]
pub fn status(state: &AppState) -> StatusResponse {
    let orders = state.store.list();
    let counts = crate::store::summarize(&orders).to_map();

    StatusResponse {
        orders_count: orders.len(),
        orders,
        counts,
        last_update: Utc::now(),
        bot_status: state.notifier.state(),
    }
}

/// Liveness plus notifier usability.
#[must_use]
pub fn health(state: &AppState) -> HealthResponse {
    HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        bot_functional: state.notifier.is_functional(),
        bot_status: state.notifier.state(),
        orders_count: state.store.len(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}
