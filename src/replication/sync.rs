use super::types::{MutationDescriptor, SyncOutcome};
use crate::catalog::store::CatalogStore;
use crate::error::ShopResult;
use crate::orders::store::OrderStore;
use crate::orders::types::Order;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::time::{SystemTime, UNIX_EPOCH};

/// Upper bound on remembered op ids before the memory is reset.
const MAX_PROCESSED_OPS: usize = 10_000;

/// Applies propagated writes on a secondary.
///
/// Catalog mutations are deduplicated by `op_id`, orders by `order_id`. The
/// secondary trusts the primary's computed effect and re-checks no business rule.
pub struct SyncApplier {
    processed_ops: DashMap<String, u64>,
}

impl SyncApplier {
    pub fn new() -> Self {
        Self {
            processed_ops: DashMap::new(),
        }
    }

    pub fn apply_mutation(
        &self,
        store: &CatalogStore,
        descriptor: &MutationDescriptor,
    ) -> ShopResult<SyncOutcome> {
        let Some(op_id) = descriptor.op_id.as_deref() else {
            store.apply_replicated(descriptor.book_id, &descriptor.mutation)?;
            self.log_applied(descriptor);
            return Ok(SyncOutcome::Applied);
        };

        // Reset before taking the entry guard: len() locks every shard
        if self.processed_ops.len() > MAX_PROCESSED_OPS {
            self.processed_ops.clear();
        }

        match self.processed_ops.entry(op_id.to_string()) {
            Entry::Occupied(_) => {
                tracing::info!(
                    "Operation {} for book {} already applied, skipping",
                    op_id,
                    descriptor.book_id
                );
                Ok(SyncOutcome::Duplicate)
            }
            Entry::Vacant(slot) => {
                // Only remember the op once it applied, so a NotFound can be redelivered
                store.apply_replicated(descriptor.book_id, &descriptor.mutation)?;
                slot.insert(now_ms());
                self.log_applied(descriptor);
                Ok(SyncOutcome::Applied)
            }
        }
    }

    pub fn apply_order(&self, store: &OrderStore, order: Order) -> ShopResult<SyncOutcome> {
        let order_id = order.order_id;

        if store.insert_replicated(order) {
            tracing::info!("Synced order {}", order_id);
            Ok(SyncOutcome::Applied)
        } else {
            tracing::info!("Order {} already exists, skipping", order_id);
            Ok(SyncOutcome::Duplicate)
        }
    }

    fn log_applied(&self, descriptor: &MutationDescriptor) {
        tracing::info!(
            "Synced {} for book {}: {:?}",
            descriptor.mutation.operation(),
            descriptor.book_id,
            descriptor.mutation
        );
    }
}

impl Default for SyncApplier {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
