use super::types::Order;
use crate::error::{ShopError, ShopResult};

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory order log of one replica.
pub struct OrderStore {
    orders: DashMap<u64, Order>,
    next_id: AtomicU64,
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Records a purchase under the next order id.
    pub fn record(&self, book_id: u64, book_title: String) -> Order {
        let order = Order {
            order_id: self.next_id.fetch_add(1, Ordering::SeqCst),
            book_id,
            book_title,
            timestamp: Utc::now(),
        };

        self.orders.insert(order.order_id, order.clone());
        tracing::info!(
            "Recorded order {} for book {}",
            order.order_id,
            order.book_id
        );
        order
    }

    /// Stores an order recorded elsewhere. Returns `false` when an order with the
    /// same id already exists; the existing one is kept.
    pub fn insert_replicated(&self, order: Order) -> bool {
        let order_id = order.order_id;

        match self.orders.entry(order_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(order);
                // Keep local ids ahead of anything replicated in
                self.next_id
                    .fetch_max(order_id.saturating_add(1), Ordering::SeqCst);
                true
            }
        }
    }

    pub fn get(&self, order_id: u64) -> ShopResult<Order> {
        self.orders
            .get(&order_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ShopError::NotFound(format!("Order {} not found", order_id)))
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}
