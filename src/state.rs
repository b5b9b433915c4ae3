//! Application state management.

use crate::config::{Config, StorageMode};
use crate::notifier::telegram::TelegramSettings;
use crate::notifier::{MessageTransport, Notifier, NotifyError, TelegramTransport};
use crate::store::{FilePersistence, MemoryPersistence, OrderPersistence, OrderStore};
use std::sync::Arc;
use tracing::info;

/// Application state shared across all handlers.
pub struct AppState {
    /// The open orders.
    pub store: Arc<OrderStore>,
    /// Notification channel.
    pub notifier: Arc<Notifier>,
    /// Telegram client, when a bot is configured. Used for update polling
    /// and webhook registration.
    pub telegram: Option<Arc<TelegramTransport>>,
    /// Application configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a state from already built parts.
    #[must_use]
    pub fn new(store: OrderStore, notifier: Notifier) -> Self {
        Self {
            store: Arc::new(store),
            notifier: Arc::new(notifier),
            telegram: None,
            config: Config::default(),
        }
    }

    /// Creates a state with an empty in-memory store and no notifier.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(OrderStore::in_memory(), Notifier::disabled())
    }

    /// Creates the application state from configuration.
    ///
    /// Opens the store for the configured storage mode and, when bot
    /// credentials are present, a Telegram transport in the probing state.
    ///
    /// # Errors
    /// Returns error if the Telegram HTTP client cannot be built.
    pub fn from_config(config: Config) -> Result<Self, NotifyError> {
        let persistence: Box<dyn OrderPersistence> = match config.storage.mode {
            StorageMode::Memory => {
                info!("Storage: memory only");
                Box::new(MemoryPersistence::new())
            }
            StorageMode::File => {
                info!("Storage: {}", config.storage.path.display());
                Box::new(FilePersistence::new(&config.storage.path))
            }
        };
        let store = OrderStore::open(persistence);

        let (notifier, telegram) = match config.notifier.credentials() {
            Some(credentials) => {
                let transport = Arc::new(TelegramTransport::new(TelegramSettings {
                    api_base_url: config.notifier.api_base_url.clone(),
                    bot_token: credentials.bot_token,
                    chat_id: credentials.chat_id,
                    timeout: config.notifier.timeout(),
                })?);
                info!("Notifier: telegram ({:?} mode)", config.notifier.mode);
                let shared: Arc<dyn MessageTransport> = transport.clone();
                (Notifier::new(shared), Some(transport))
            }
            None => {
                info!("Notifier: disabled");
                (Notifier::disabled(), None)
            }
        };

        Ok(Self {
            store: Arc::new(store),
            notifier: Arc::new(notifier),
            telegram,
            config,
        })
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotifierMode;
    use crate::notifier::NotifierState;

    #[test]
    fn test_in_memory_state() {
        let state = AppState::in_memory();
        assert!(state.store.is_empty());
        assert_eq!(state.notifier.state(), NotifierState::Unconfigured);
        assert!(state.telegram.is_none());
    }

    #[test]
    fn test_from_config_without_credentials_disables_notifier() {
        let mut config = Config::default();
        config.storage.mode = StorageMode::Memory;
        config.notifier.mode = NotifierMode::Polling;

        let state = AppState::from_config(config).expect("state");

        assert_eq!(state.notifier.state(), NotifierState::Unconfigured);
        assert!(state.telegram.is_none());
    }

    #[test]
    fn test_from_config_with_credentials_starts_probing() {
        let mut config = Config::default();
        config.storage.mode = StorageMode::Memory;
        config.notifier.mode = NotifierMode::Webhook;
        config.notifier.bot_token = Some("123456789:ABCdefGhIJKlmNoPQRsTUVwxyZ".to_string());
        config.notifier.chat_id = Some("42".to_string());

        let state = AppState::from_config(config).expect("state");

        assert_eq!(state.notifier.state(), NotifierState::Probing);
        assert!(state.telegram.is_some());
    }

    #[test]
    fn test_from_config_loads_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        std::fs::write(
            &path,
            r#"[{"guest":"Ana","coffee":"Espresso","createdAt":"2024-05-01T08:30:00Z"}]"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.storage.path = path;

        let state = AppState::from_config(config).expect("state");
        assert_eq!(state.store.len(), 1);
    }
}
