//! Inbound bot updates: "done" button presses and chat commands.
//!
//! Updates arrive either from the long-poll loop started by
//! [`spawn_background_tasks`] or through the webhook route, and are handled
//! the same way in both cases.

use crate::config::NotifierMode;
use crate::error::ApiError;
use crate::notifier::telegram::Update;
use crate::notifier::{OrderKey, OutboundMessage, messages};
use crate::service;
use crate::state::AppState;
use crate::store::summarize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Route that receives webhook updates.
pub const WEBHOOK_PATH: &str = "/telegram/webhook";

/// Pause after a failed `getUpdates` call.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// What an update asks us to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// A "done" button was pressed.
    Complete {
        /// Callback to acknowledge.
        callback_id: String,
        /// Order to remove.
        key: OrderKey,
    },
    /// A button we do not recognize was pressed.
    UnknownCallback {
        /// Callback to acknowledge.
        callback_id: String,
    },
    /// `/orders`: list open orders.
    ListOrders,
    /// `/clear`: remove every open order.
    ClearAll,
    /// `/start` or `/help`.
    Help,
}

impl BotCommand {
    /// Interprets an update. Returns `None` for updates that need no action.
    #[must_use]
    pub fn from_update(update: &Update) -> Option<Self> {
        if let Some(callback) = &update.callback_query {
            let callback_id = callback.id.clone();
            return Some(
                match callback.data.as_deref().and_then(OrderKey::from_callback_data) {
                    Some(key) => Self::Complete { callback_id, key },
                    None => Self::UnknownCallback { callback_id },
                },
            );
        }

        let text = update.message.as_ref()?.text.as_deref()?.trim();
        let command = text.split_whitespace().next()?;
        // Commands in group chats carry the bot name: `/orders@kiosk_bot`.
        let command = command.split('@').next().unwrap_or(command);

        match command.to_ascii_lowercase().as_str() {
            "/orders" | "/status" => Some(Self::ListOrders),
            "/clear" => Some(Self::ClearAll),
            "/start" | "/help" => Some(Self::Help),
            _ => None,
        }
    }
}

const HELP_TEXT: &str = "☕ <b>Coffee orders</b>\n\
/orders - list open orders\n\
/clear - remove all open orders\n\
Press ✅ Done under an order once it is served.";

/// Handles one update.
pub async fn handle_update(state: &AppState, update: Update) {
    let Some(command) = BotCommand::from_update(&update) else {
        debug!("Ignoring update {}", update.update_id);
        return;
    };
    debug!("Update {}: {:?}", update.update_id, command);

    match command {
        BotCommand::Complete { callback_id, key } => {
            let reply = match service::complete_order(state, &key.guest, &key.coffee).await {
                Ok(_) => "Done",
                Err(ApiError::NotFound(_)) => "Order not found",
                Err(err) => {
                    error!("Failed to complete order from bot: {}", err);
                    "Something went wrong"
                }
            };
            state.notifier.acknowledge(&callback_id, reply).await;
        }
        BotCommand::UnknownCallback { callback_id } => {
            state
                .notifier
                .acknowledge(&callback_id, "Unknown action")
                .await;
        }
        BotCommand::ListOrders => {
            let orders = state.store.list();
            state.notifier.send(messages::open_orders(&orders)).await;
            state
                .notifier
                .send(messages::summary(&summarize(&orders)))
                .await;
        }
        BotCommand::ClearAll => {
            let response = service::clear_orders(state).await;
            if response.telegram.is_none() {
                state.notifier.send(messages::open_orders(&[])).await;
            }
        }
        BotCommand::Help => {
            state
                .notifier
                .send(OutboundMessage::text(HELP_TEXT))
                .await;
        }
    }
}

/// Long-polls the Bot API for updates until the task is aborted.
async fn run_polling(state: Arc<AppState>) {
    let Some(telegram) = state.telegram.clone() else {
        return;
    };
    let poll_timeout = state.config.notifier.poll_timeout();

    // Updates are only delivered to polling clients while no webhook is set.
    if let Err(err) = telegram.delete_webhook().await {
        warn!("Failed to remove webhook before polling: {}", err);
    }
    info!("Polling bot updates");

    let mut offset = None;
    loop {
        match telegram.get_updates(offset, poll_timeout).await {
            Ok(updates) => {
                for update in updates {
                    offset = Some(update.update_id + 1);
                    handle_update(&state, update).await;
                }
            }
            Err(err) => {
                warn!("Failed to fetch bot updates: {}", err);
                tokio::time::sleep(POLL_RETRY_DELAY).await;
            }
        }
    }
}

/// Starts the startup probe and, depending on the notifier mode, the update
/// poller or the webhook registration.
///
/// Does nothing when no bot is configured.
pub fn spawn_background_tasks(state: &Arc<AppState>) -> Vec<JoinHandle<()>> {
    let Some(telegram) = state.telegram.clone() else {
        return Vec::new();
    };

    let mut tasks = Vec::new();

    let notifier = Arc::clone(&state.notifier);
    tasks.push(tokio::spawn(async move {
        notifier.probe().await;
    }));

    match state.config.notifier.mode {
        NotifierMode::Polling => {
            tasks.push(tokio::spawn(run_polling(Arc::clone(state))));
        }
        NotifierMode::Webhook => match state.config.notifier.webhook_url.clone() {
            Some(base_url) => {
                let url = format!("{}{}", base_url.trim_end_matches('/'), WEBHOOK_PATH);
                tasks.push(tokio::spawn(async move {
                    if let Err(err) = telegram.set_webhook(&url).await {
                        warn!("Failed to register webhook: {}", err);
                    }
                }));
            }
            None => info!("No webhook URL configured, expecting an existing registration"),
        },
        NotifierMode::Disabled => {}
    }

    tasks
}
