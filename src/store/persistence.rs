//! Persistence backends for the order store.
//!
//! Both operations are best-effort: failures are logged and never reach the
//! caller, since the in-memory list stays authoritative for the running
//! process.

use crate::models::Order;
use parking_lot::Mutex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where the order list is kept between restarts.
pub trait OrderPersistence: Send + Sync {
    /// Reads the persisted list. Returns an empty list if nothing was
    /// persisted or the data cannot be read.
    fn load(&self) -> Vec<Order>;

    /// Replaces the persisted list with `orders`.
    fn save(&self, orders: &[Order]);
}

/// Keeps the last saved snapshot in memory only.
///
/// Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    snapshot: Mutex<Vec<Order>>,
}

impl MemoryPersistence {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that reports `orders` on the first load.
    #[must_use]
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            snapshot: Mutex::new(orders),
        }
    }

    /// Returns the last saved snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Order> {
        self.snapshot.lock().clone()
    }
}

impl OrderPersistence for MemoryPersistence {
    fn load(&self) -> Vec<Order> {
        self.snapshot.lock().clone()
    }

    fn save(&self, orders: &[Order]) {
        *self.snapshot.lock() = orders.to_vec();
    }
}

/// Stores the order list as a JSON array in a single file.
///
/// Every save rewrites the whole file through a sibling temp file followed by
/// a rename, so a crash mid-write leaves the previous list intact.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    /// Creates a backend for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "orders.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read(&self) -> Result<Option<Vec<Order>>, io::Error> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };

        if content.trim().is_empty() {
            return Ok(Some(Vec::new()));
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    fn write(&self, orders: &[Order]) -> Result<(), io::Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let body = serde_json::to_vec(orders)?;
        let temp = self.temp_path();
        fs::write(&temp, body)?;
        fs::rename(&temp, &self.path)
    }
}

impl OrderPersistence for FilePersistence {
    fn load(&self) -> Vec<Order> {
        match self.read() {
            Ok(Some(orders)) => {
                info!("Loaded {} orders from {}", orders.len(), self.path.display());
                orders
            }
            Ok(None) => {
                info!("No order file at {}, starting empty", self.path.display());
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "Failed to load orders from {}: {}, starting empty",
                    self.path.display(),
                    err
                );
                Vec::new()
            }
        }
    }

    fn save(&self, orders: &[Order]) {
        match self.write(orders) {
            Ok(()) => debug!("Saved {} orders to {}", orders.len(), self.path.display()),
            Err(err) => warn!("Failed to save orders to {}: {}", self.path.display(), err),
        }
    }
}
