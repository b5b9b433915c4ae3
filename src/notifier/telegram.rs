//! Telegram Bot API transport.

use crate::notifier::{MessageTransport, NotifyError, OutboundMessage};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Telegram transport configuration.
#[derive(Debug, Clone)]
pub struct TelegramSettings {
    /// API base URL, normally `https://api.telegram.org`.
    pub api_base_url: String,
    /// Bot token.
    pub bot_token: String,
    /// Chat that receives notifications.
    pub chat_id: String,
    /// Timeout for ordinary API calls.
    pub timeout: Duration,
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BotUser {
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardButton {
    text: &'static str,
    callback_data: String,
}

#[derive(Debug, Serialize)]
struct AnswerCallbackRequest<'a> {
    callback_query_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: [&'static str; 2],
}

#[derive(Debug, Serialize)]
struct SetWebhookRequest<'a> {
    url: &'a str,
    allowed_updates: [&'static str; 2],
}

#[derive(Debug, Serialize)]
struct EmptyRequest {}

const ALLOWED_UPDATES: [&str; 2] = ["message", "callback_query"];

/// An incoming update.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonic update identifier.
    pub update_id: i64,
    /// A new chat message.
    #[serde(default)]
    pub message: Option<Message>,
    /// A button press.
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

/// A chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Message identifier.
    pub message_id: i64,
    /// Text content.
    #[serde(default)]
    pub text: Option<String>,
}

/// A button press on one of our messages.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    /// Identifier to acknowledge.
    pub id: String,
    /// Data attached to the pressed button.
    #[serde(default)]
    pub data: Option<String>,
}

// ============================================================================
// Transport
// ============================================================================

/// Telegram Bot API client.
#[derive(Debug, Clone)]
pub struct TelegramTransport {
    client: Client,
    api_url: String,
    chat_id: String,
    timeout: Duration,
}

impl TelegramTransport {
    /// Creates a transport.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(settings: TelegramSettings) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .build()
            .map_err(|err| NotifyError::Http(err.without_url()))?;

        Ok(Self {
            client,
            api_url: format!(
                "{}/bot{}",
                settings.api_base_url.trim_end_matches('/'),
                settings.bot_token
            ),
            chat_id: settings.chat_id,
            timeout: settings.timeout,
        })
    }

    /// Calls a Bot API method.
    async fn call<B, T>(&self, method: &str, body: &B, timeout: Duration) -> Result<T, NotifyError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.api_url, method);
        let resp = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|err| NotifyError::Http(err.without_url()))?;

        let parsed: ApiResponse<T> = resp
            .json()
            .await
            .map_err(|err| NotifyError::Http(err.without_url()))?;

        if !parsed.ok {
            return Err(NotifyError::Api(
                parsed
                    .description
                    .unwrap_or_else(|| format!("{} failed", method)),
            ));
        }

        parsed
            .result
            .ok_or_else(|| NotifyError::InvalidResponse(format!("{} returned no result", method)))
    }

    /// Long-polls for updates after `offset`.
    ///
    /// # Errors
    /// Returns error if the request fails or the API rejects it.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        poll_timeout: Duration,
    ) -> Result<Vec<Update>, NotifyError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: poll_timeout.as_secs(),
            allowed_updates: ALLOWED_UPDATES,
        };
        self.call("getUpdates", &request, poll_timeout + self.timeout)
            .await
    }

    /// Registers a webhook URL with the Bot API.
    ///
    /// # Errors
    /// Returns error if the request fails or the API rejects it.
    pub async fn set_webhook(&self, url: &str) -> Result<(), NotifyError> {
        let request = SetWebhookRequest {
            url,
            allowed_updates: ALLOWED_UPDATES,
        };
        let _: bool = self.call("setWebhook", &request, self.timeout).await?;
        info!("Telegram webhook registered at {}", url);
        Ok(())
    }

    /// Removes any registered webhook so that polling can receive updates.
    ///
    /// # Errors
    /// Returns error if the request fails or the API rejects it.
    pub async fn delete_webhook(&self) -> Result<(), NotifyError> {
        let _: bool = self
            .call("deleteWebhook", &EmptyRequest {}, self.timeout)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    async fn probe(&self) -> Result<(), NotifyError> {
        let me: BotUser = self.call("getMe", &EmptyRequest {}, self.timeout).await?;
        info!(
            "Telegram bot reachable as @{}",
            me.username.as_deref().unwrap_or("unknown")
        );
        Ok(())
    }

    async fn send(&self, message: &OutboundMessage) -> Result<Option<i64>, NotifyError> {
        let reply_markup = message
            .done_action
            .as_ref()
            .and_then(|key| key.to_callback_data())
            .map(|callback_data| InlineKeyboardMarkup {
                inline_keyboard: vec![vec![InlineKeyboardButton {
                    text: "✅ Done",
                    callback_data,
                }]],
            });

        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text: &message.text,
            parse_mode: "HTML",
            reply_markup,
        };

        let sent: Message = self.call("sendMessage", &request, self.timeout).await?;
        debug!("Telegram message {} sent", sent.message_id);
        Ok(Some(sent.message_id))
    }

    async fn acknowledge(&self, callback_id: &str, text: &str) -> Result<(), NotifyError> {
        let request = AnswerCallbackRequest {
            callback_query_id: callback_id,
            text,
        };
        let _: bool = self
            .call("answerCallbackQuery", &request, self.timeout)
            .await?;
        Ok(())
    }
}
