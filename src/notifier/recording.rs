//! In-process transport that records messages instead of sending them.
//!
//! Used by tests and local runs to observe notifications and to simulate an
//! unreachable bot.

use crate::notifier::{MessageTransport, NotifyError, OutboundMessage};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Transport that keeps every delivered message in memory.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    failing: AtomicBool,
    sent: Mutex<Vec<OutboundMessage>>,
    acknowledged: Mutex<Vec<(String, String)>>,
}

impl RecordingTransport {
    /// Creates a transport that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport that rejects every call.
    #[must_use]
    pub fn failing() -> Self {
        let transport = Self::default();
        transport.set_failing(true);
        transport
    }

    /// Switches between accepting and rejecting calls.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages delivered so far.
    #[must_use]
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().clone()
    }

    /// Callback acknowledgements as (callback id, text) pairs.
    #[must_use]
    pub fn acknowledged(&self) -> Vec<(String, String)> {
        self.acknowledged.lock().clone()
    }

    fn check(&self) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(NotifyError::Api("bot unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn probe(&self) -> Result<(), NotifyError> {
        self.check()
    }

    async fn send(&self, message: &OutboundMessage) -> Result<Option<i64>, NotifyError> {
        self.check()?;
        let mut sent = self.sent.lock();
        sent.push(message.clone());
        Ok(Some(sent.len() as i64))
    }

    async fn acknowledge(&self, callback_id: &str, text: &str) -> Result<(), NotifyError> {
        self.check()?;
        self.acknowledged
            .lock()
            .push((callback_id.to_string(), text.to_string()));
        Ok(())
    }
}
