//! Request and response types for the order API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;


/// Whether a placed order was new or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderAction {
    /// A new order was stored.
    Created,
    /// An existing order was updated.
    Updated,
}

impl std::fmt::Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
        }
    }
}

// ============================================================================
// Orders
// ============================================================================

/// An open order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Guest name.
    pub guest: String,
    /// Drink name.
    pub coffee: String,
    /// Free-form options.
    #[serde(default)]
    pub options: Option<String>,
    /// When the order was placed or last updated.
    pub created_at: DateTime<Utc>,
}

/// Request to place or update an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// Guest name.
    pub guest: String,
    /// Drink name.
    pub coffee: String,
    /// Free-form options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    /// Decaffeinated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decaf: Option<bool>,
    /// Oat milk instead of dairy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oat_milk: Option<bool>,
}

impl PlaceOrderRequest {
    /// Creates a request without options.
    pub fn new(guest: impl Into<String>, coffee: impl Into<String>) -> Self {
        Self {
            guest: guest.into(),
            coffee: coffee.into(),
            ..Default::default()
        }
    }

    /// Sets the free-form options.
    #[must_use]
    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    /// Asks for a decaffeinated drink.
    #[must_use]
    pub fn decaf(mut self) -> Self {
        self.decaf = Some(true);
        self
    }

    /// Asks for oat milk.
    #[must_use]
    pub fn oat_milk(mut self) -> Self {
        self.oat_milk = Some(true);
        self
    }
}

/// Outcome of the notification attached to an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReport {
    /// Whether the notification was delivered.
    pub sent: bool,
    /// Message identifier assigned by the bot API.
    #[serde(default)]
    pub message_id: Option<i64>,
    /// Why the notification was not delivered.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Response to placing an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderResponse {
    /// Always true.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Created or updated.
    pub action: OrderAction,
    /// The stored order.
    pub order: Order,
    /// Notification outcome.
    pub telegram: DeliveryReport,
}

/// Response to a delete operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    /// Always true.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Notification outcome, absent when nothing was sent.
    #[serde(default)]
    pub telegram: Option<DeliveryReport>,
}

// ============================================================================
// Status & Health
// ============================================================================

/// Open orders with per-drink counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Open orders in insertion order.
    pub orders: Vec<Order>,
    /// Count per known drink.
    pub counts: BTreeMap<String, usize>,
    /// Number of open orders.
    pub orders_count: usize,
    /// Time of this snapshot.
    pub last_update: DateTime<Utc>,
    /// Notifier state.
    pub bot_status: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Server time.
    pub timestamp: DateTime<Utc>,
    /// Whether the notifier is usable.
    pub bot_functional: bool,
    /// Notifier state.
    pub bot_status: String,
    /// Number of open orders.
    pub orders_count: usize,
    /// Service version.
    pub version: String,
}

/// Error body returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
    /// Error code.
    pub code: String,
}
