//! Domain types and request/response models for the REST API.

use crate::notifier::{DeliveryReport, NotifierState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Drink kinds offered by the kiosk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum CoffeeKind {
    /// Cappuccino.
    Cappuccino,
    /// Latte Macchiato.
    #[serde(rename = "Latte Macchiato")]
    LatteMacchiato,
    /// Americano.
    Americano,
    /// Espresso.
    Espresso,
}

impl CoffeeKind {
    /// Every kind, in menu order.
    pub const ALL: [CoffeeKind; 4] = [
        CoffeeKind::Cappuccino,
        CoffeeKind::LatteMacchiato,
        CoffeeKind::Americano,
        CoffeeKind::Espresso,
    ];

    /// Returns the display name used on the menu and on the wire.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cappuccino => "Cappuccino",
            Self::LatteMacchiato => "Latte Macchiato",
            Self::Americano => "Americano",
            Self::Espresso => "Espresso",
        }
    }

    /// Parses a display name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    const fn index(self) -> usize {
        match self {
            Self::Cappuccino => 0,
            Self::LatteMacchiato => 1,
            Self::Americano => 2,
            Self::Espresso => 3,
        }
    }
}

impl std::fmt::Display for CoffeeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An open order.
///
/// The pair (`guest`, `coffee`), compared case-insensitively, identifies an
/// order; the store never holds two orders with the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Name of the guest who ordered.
    pub guest: String,
    /// Drink name, normally one of the [`CoffeeKind`] names.
    pub coffee: String,
    /// Free-form extras such as "decaf, oat milk".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    /// Time of insertion or last update.
    #[serde(alias = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates an order stamped with the current time.
    #[must_use]
    pub fn new(guest: impl Into<String>, coffee: impl Into<String>, options: Option<String>) -> Self {
        Self {
            guest: guest.into(),
            coffee: coffee.into(),
            options,
            created_at: Utc::now(),
        }
    }

    /// Returns true if this order has the given identity, ignoring case.
    #[must_use]
    pub fn matches(&self, guest: &str, coffee: &str) -> bool {
        self.guest.to_lowercase() == guest.to_lowercase()
            && self.coffee.to_lowercase() == coffee.to_lowercase()
    }

    /// Returns the recognized drink kind, if any.
    #[must_use]
    pub fn kind(&self) -> Option<CoffeeKind> {
        CoffeeKind::parse(&self.coffee)
    }
}

/// Number of open orders per drink kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderSummary {
    counts: [usize; 4],
}

impl OrderSummary {
    /// Adds one order of the given kind.
    pub fn record(&mut self, kind: CoffeeKind) {
        self.counts[kind.index()] += 1;
    }

    /// Returns the count for a kind.
    #[must_use]
    pub fn get(&self, kind: CoffeeKind) -> usize {
        self.counts[kind.index()]
    }

    /// Sum over all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Iterates over every kind with its count, in menu order.
    pub fn iter(&self) -> impl Iterator<Item = (CoffeeKind, usize)> + '_ {
        CoffeeKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    /// Converts to a name-keyed map for JSON responses.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, usize> {
        self.iter()
            .map(|(kind, count)| (kind.name().to_string(), count))
            .collect()
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Request to place or update an order.
///
/// `guest` and `coffee` are optional at the type level so that a missing
/// field is reported as a validation error rather than a decoding error.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// Name of the guest (required).
    #[serde(default)]
    pub guest: Option<String>,
    /// Drink name (required).
    #[serde(default)]
    pub coffee: Option<String>,
    /// Extras as text, a list, or a map of flags.
    #[serde(default)]
    pub options: Option<OrderOptions>,
    /// Decaffeinated.
    #[serde(default)]
    pub decaf: Option<bool>,
    /// Oat milk instead of cow milk.
    #[serde(default)]
    pub oat_milk: Option<bool>,
}

/// Extras attached to a submission.
///
/// Kiosk clients send either free text, a list of extras, or a map of
/// flags; all of them are stored as a single comma-separated text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum OrderOptions {
    /// `"decaf, oat milk"`
    Text(String),
    /// `["decaf", "oat milk"]`
    List(Vec<String>),
    /// `{"decaf": true, "oatMilk": true}`
    Flags(BTreeMap<String, bool>),
}

impl OrderOptions {
    /// Flattens the options into display text. Returns `None` when nothing
    /// is left after dropping blanks and unset flags.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        let parts: Vec<String> = match self {
            Self::Text(text) => vec![text.trim().to_string()],
            Self::List(items) => items.iter().map(|i| i.trim().to_string()).collect(),
            Self::Flags(flags) => flags
                .iter()
                .filter(|(_, set)| **set)
                .map(|(name, _)| flag_label(name))
                .collect(),
        };
        let parts: Vec<String> = parts.into_iter().filter(|p| !p.is_empty()).collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

impl From<&str> for OrderOptions {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Turns a flag key such as `oatMilk` or `oat_milk` into `oat milk`.
fn flag_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 2);
    for c in key.trim().chars() {
        if c == '_' || c == '-' {
            label.push(' ');
        } else if c.is_uppercase() {
            if !label.is_empty() && !label.ends_with(' ') {
                label.push(' ');
            }
            label.extend(c.to_lowercase());
        } else {
            label.push(c);
        }
    }
    label
}

// ============================================================================
// Responses
// ============================================================================

/// Whether a submission created a new order or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderAction {
    /// A new order was appended.
    Created,
    /// An existing order was updated in place.
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

/// Response after placing an order.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceOrderResponse {
    /// Always true; failures are reported as error responses.
    pub success: bool,
    /// Human-readable result.
    pub message: String,
    /// Whether the order was created or updated.
    pub action: OrderAction,
    /// The stored order.
    pub order: Order,
    /// Outcome of the notification attempt.
    pub telegram: DeliveryReport,
}

/// Response for delete operations.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Always true; failures are reported as error responses.
    pub success: bool,
    /// Human-readable result.
    pub message: String,
    /// Outcome of the notification attempt, when one was made.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<DeliveryReport>,
}

/// Current open orders.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Open orders in insertion order.
    pub orders: Vec<Order>,
    /// Open orders per drink kind.
    pub counts: BTreeMap<String, usize>,
    /// Number of open orders.
    pub orders_count: usize,
    /// Time this response was produced.
    pub last_update: DateTime<Utc>,
    /// Notifier state.
    pub bot_status: NotifierState,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Time of the check.
    pub timestamp: DateTime<Utc>,
    /// Whether the notifier is currently considered usable.
    pub bot_functional: bool,
    /// Notifier state.
    pub bot_status: NotifierState,
    /// Number of open orders.
    pub orders_count: usize,
    /// Service version.
    pub version: String,
}

/// Acknowledgement returned to the bot webhook.
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    /// Always true.
    pub ok: bool,
}
