//! The order store: the authoritative list of open orders.
//!
//! Every mutation rewrites the whole list through the configured
//! [`OrderPersistence`] backend while the write lock is held, so the persisted
//! list always matches the order of the in-memory one.

mod persistence;


pub use persistence::{FilePersistence, MemoryPersistence, OrderPersistence};

use crate::models::{Order, OrderAction, OrderSummary};
use chrono::Utc;
use parking_lot::RwLock;
use tracing::info;

/// Result of an upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upserted {
    /// The order as stored after the call.
    pub order: Order,
    /// Whether it was appended or updated in place.
    pub action: OrderAction,
}

/// In-memory order list backed by a persistence backend.
///
/// Every mutation saves the whole list synchronously while the write lock is
/// held, so the file always matches memory order. With the file backend this
/// is blocking I/O on the calling task; the list is a handful of open orders
/// at a kiosk, so the write stays small. Move `save` onto
/// `tokio::task::spawn_blocking` if that stops being true.
pub struct OrderStore {
    orders: RwLock<Vec<Order>>,
    persistence: Box<dyn OrderPersistence>,
}

impl OrderStore {
    /// Opens a store, loading whatever the backend has persisted.
    #[must_use]
    pub fn open(persistence: Box<dyn OrderPersistence>) -> Self {
        let orders = persistence.load();
        Self {
            orders: RwLock::new(orders),
            persistence,
        }
    }

    /// Opens an empty store that keeps nothing across restarts.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryPersistence::new()))
    }

    /// Inserts a new order or updates the one with the same identity.
    ///
    /// On a match the existing entry keeps its position; its spelling,
    /// options and timestamp are replaced by the new submission.
    pub fn upsert(&self, guest: &str, coffee: &str, options: Option<String>) -> Upserted {
        let mut orders = self.orders.write();

        let upserted = match orders.iter_mut().find(|o| o.matches(guest, coffee)) {
            Some(existing) => {
                existing.guest = guest.to_string();
                existing.coffee = coffee.to_string();
                existing.options = options;
                existing.created_at = Utc::now();
                Upserted {
                    order: existing.clone(),
                    action: OrderAction::Updated,
                }
            }
            None => {
                let order = Order::new(guest, coffee, options);
                orders.push(order.clone());
                Upserted {
                    order,
                    action: OrderAction::Created,
                }
            }
        };

        self.persistence.save(&orders);
        info!(
            "Order {}: {} / {} ({} open)",
            upserted.action,
            upserted.order.guest,
            upserted.order.coffee,
            orders.len()
        );
        upserted
    }

    /// Removes the first order with the given identity.
    ///
    /// Returns the removed order, or `None` if nothing matched, in which case
    /// neither memory nor persisted state is touched.
    pub fn remove(&self, guest: &str, coffee: &str) -> Option<Order> {
        let mut orders = self.orders.write();
        let index = orders.iter().position(|o| o.matches(guest, coffee))?;
        let removed = orders.remove(index);

        self.persistence.save(&orders);
        info!(
            "Order removed: {} / {} ({} open)",
            removed.guest,
            removed.coffee,
            orders.len()
        );
        Some(removed)
    }

    /// Removes every order and returns how many there were.
    pub fn clear(&self) -> usize {
        let mut orders = self.orders.write();
        let count = orders.len();
        if count == 0 {
            return 0;
        }

        orders.clear();
        self.persistence.save(&orders);
        info!("Cleared {} orders", count);
        count
    }

    /// Returns a copy of the open orders in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<Order> {
        self.orders.read().clone()
    }

    /// Number of open orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    /// Returns true if there are no open orders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }

    /// Counts the open orders per drink kind.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        summarize(&self.orders.read())
    }
}

/// Counts orders per drink kind. Orders with an unrecognized drink are
/// skipped.
#[must_use]
pub fn summarize(orders: &[Order]) -> OrderSummary {
    let mut summary = OrderSummary::default();
    for kind in orders.iter().filter_map(Order::kind) {
        summary.record(kind);
    }
    summary
}
