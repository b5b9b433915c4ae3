//! Best-effort notifications to a messaging bot.
//!
//! A [`Notifier`] wraps an optional [`MessageTransport`] and owns the
//! usability state machine:
//!
//! ```text
//! Unconfigured            (no transport)
//! Probing ──probe ok / send ok──▶ Functional
//!    │                               │  ▲
//!    └──probe err / send err──▶ Degraded ┘ (next successful send)
//! ```
//!
//! Sending never fails the caller: every attempt produces a
//! [`DeliveryReport`] and updates the state.

pub mod messages;
pub mod recording;
pub mod telegram;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::form_urlencoded;
use utoipa::ToSchema;

pub use recording::RecordingTransport;
pub use telegram::TelegramTransport;

/// Prefix of the callback data attached to "done" buttons.
const DONE_CALLBACK_PREFIX: &str = "done:";

/// Maximum callback data size accepted by Telegram, in bytes.
const MAX_CALLBACK_DATA_LEN: usize = 64;

/// Notifier error types.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The HTTP request failed or timed out. Never carries the request URL,
    /// which embeds the bot token.
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    /// The bot API answered with an error.
    #[error("Bot API error: {0}")]
    Api(String),

    /// The bot API answered with something unexpected.
    #[error("Invalid bot API response: {0}")]
    InvalidResponse(String),
}

/// Usability of the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotifierState {
    /// No credentials; nothing is ever sent.
    Unconfigured,
    /// Credentials present, liveness not yet known.
    Probing,
    /// Last probe or send succeeded.
    Functional,
    /// Last probe or send failed.
    Degraded,
}

impl std::fmt::Display for NotifierState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "unconfigured"),
            Self::Probing => write!(f, "probing"),
            Self::Functional => write!(f, "functional"),
            Self::Degraded => write!(f, "degraded"),
        }
    }
}

/// Identity of an order referenced from a message button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    /// Guest name.
    pub guest: String,
    /// Drink name.
    pub coffee: String,
}

impl OrderKey {
    /// Creates a key.
    pub fn new(guest: impl Into<String>, coffee: impl Into<String>) -> Self {
        Self {
            guest: guest.into(),
            coffee: coffee.into(),
        }
    }

    /// Encodes the key as button callback data, or `None` if it does not fit.
    ///
    /// Both parts are form-urlencoded, so neither can contain the `:`
    /// separator.
    #[must_use]
    pub fn to_callback_data(&self) -> Option<String> {
        let data = format!(
            "{}{}:{}",
            DONE_CALLBACK_PREFIX,
            encode_part(&self.guest),
            encode_part(&self.coffee)
        );
        (data.len() <= MAX_CALLBACK_DATA_LEN).then_some(data)
    }

    /// Decodes button callback data produced by [`OrderKey::to_callback_data`].
    #[must_use]
    pub fn from_callback_data(data: &str) -> Option<Self> {
        let rest = data.strip_prefix(DONE_CALLBACK_PREFIX)?;
        let (guest, coffee) = rest.split_once(':')?;
        if coffee.contains(':') {
            return None;
        }
        Some(Self::new(decode_part(guest)?, decode_part(coffee)?))
    }
}

fn encode_part(part: &str) -> String {
    form_urlencoded::byte_serialize(part.as_bytes()).collect()
}

fn decode_part(part: &str) -> Option<String> {
    // Encoded parts never contain `&` or `=`, so they parse as a single key.
    form_urlencoded::parse(part.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .filter(|key| !key.is_empty())
}

/// A message to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Message body (HTML).
    pub text: String,
    /// Order to complete when the recipient presses "done".
    pub done_action: Option<OrderKey>,
}

impl OutboundMessage {
    /// Creates a plain message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done_action: None,
        }
    }

    /// Attaches a "done" button for the given order.
    #[must_use]
    pub fn with_done_action(mut self, key: OrderKey) -> Self {
        self.done_action = Some(key);
        self
    }
}

/// Outcome of a single send attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReport {
    /// Whether the message was delivered.
    pub sent: bool,
    /// Identifier assigned by the bot API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<i64>,
    /// Why the message was not delivered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DeliveryReport {
    /// A delivered message.
    #[must_use]
    pub fn delivered(message_id: Option<i64>) -> Self {
        Self {
            sent: true,
            message_id,
            reason: None,
        }
    }

    /// An undelivered message.
    pub fn not_sent(reason: impl Into<String>) -> Self {
        Self {
            sent: false,
            message_id: None,
            reason: Some(reason.into()),
        }
    }
}

/// Transport to a messaging service.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Checks that the credentials work.
    async fn probe(&self) -> Result<(), NotifyError>;

    /// Delivers a message and returns its identifier if the service assigns one.
    async fn send(&self, message: &OutboundMessage) -> Result<Option<i64>, NotifyError>;

    /// Answers a button press.
    async fn acknowledge(&self, _callback_id: &str, _text: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Notifier handle shared by request handlers.
pub struct Notifier {
    transport: Option<Arc<dyn MessageTransport>>,
    state: RwLock<NotifierState>,
}

impl Notifier {
    /// Creates a notifier that never sends.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            transport: None,
            state: RwLock::new(NotifierState::Unconfigured),
        }
    }

    /// Creates a notifier over a transport. It starts in
    /// [`NotifierState::Probing`] until a probe or send reports back.
    #[must_use]
    pub fn new(transport: Arc<dyn MessageTransport>) -> Self {
        Self {
            transport: Some(transport),
            state: RwLock::new(NotifierState::Probing),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> NotifierState {
        *self.state.read()
    }

    /// Returns true if the last probe or send succeeded.
    #[must_use]
    pub fn is_functional(&self) -> bool {
        self.state() == NotifierState::Functional
    }

    fn set_state(&self, next: NotifierState) {
        let mut state = self.state.write();
        if *state != next {
            info!("Notifier state: {} -> {}", *state, next);
            *state = next;
        }
    }

    /// Runs a liveness check and records the result.
    ///
    /// Returns false without probing when unconfigured.
    pub async fn probe(&self) -> bool {
        let Some(transport) = &self.transport else {
            return false;
        };

        match transport.probe().await {
            Ok(()) => {
                self.set_state(NotifierState::Functional);
                true
            }
            Err(err) => {
                warn!("Notifier probe failed: {}", err);
                self.set_state(NotifierState::Degraded);
                false
            }
        }
    }

    /// Attempts to deliver a message and records the result.
    pub async fn send(&self, message: OutboundMessage) -> DeliveryReport {
        let Some(transport) = &self.transport else {
            debug!("Notifier disabled, not sending: {}", message.text);
            return DeliveryReport::not_sent("notifier disabled");
        };

        match transport.send(&message).await {
            Ok(message_id) => {
                debug!("Notification delivered: {:?}", message_id);
                self.set_state(NotifierState::Functional);
                DeliveryReport::delivered(message_id)
            }
            Err(err) => {
                warn!("Failed to deliver notification: {}", err);
                self.set_state(NotifierState::Degraded);
                DeliveryReport::not_sent(err.to_string())
            }
        }
    }

    /// Answers a button press. Failures are logged only.
    pub async fn acknowledge(&self, callback_id: &str, text: &str) {
        if let Some(transport) = &self.transport
            && let Err(err) = transport.acknowledge(callback_id, text).await
        {
            warn!("Failed to acknowledge callback {}: {}", callback_id, err);
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::disabled()
    }
}
