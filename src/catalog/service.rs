use super::store::CatalogStore;
use super::types::{BookInfo, BookSummary, Committed};
use crate::config::CatalogConfig;
use crate::error::{ShopError, ShopResult};
use crate::protocol::Change;
use crate::replication::invalidation::InvalidationBroadcaster;
use crate::replication::link::HttpPeerLink;
use crate::replication::outbox::Outbox;
use crate::replication::propagator::Propagator;
use crate::replication::protocol::{ENDPOINT_INVALIDATE, ENDPOINT_SYNC, SyncRequest};
use crate::replication::sync::SyncApplier;
use crate::replication::types::{Mutation, MutationDescriptor, NodeRole, SyncOutcome};

use parking_lot::Mutex;
use std::sync::Arc;

/// Work a primary does after every committed write.
pub struct PrimaryDuties {
    pub propagator: Propagator,
    pub invalidator: InvalidationBroadcaster,
}

struct Replication {
    duties: Arc<PrimaryDuties>,
    outbox: Outbox,
}

/// One catalog replica.
pub struct CatalogNode {
    store: Arc<CatalogStore>,
    role: NodeRole,
    replication: Option<Replication>,
    applier: SyncApplier,
    /// Held across commit and submission so the outbox sees writes in commit order.
    commit_order: Mutex<()>,
}

impl CatalogNode {
    /// Must be called from within a Tokio runtime: starts the replication outbox.
    pub fn primary(store: Arc<CatalogStore>, duties: PrimaryDuties) -> Self {
        Self {
            store,
            role: NodeRole::Primary,
            replication: Some(Replication {
                duties: Arc::new(duties),
                outbox: Outbox::spawn("catalog"),
            }),
            applier: SyncApplier::new(),
            commit_order: Mutex::new(()),
        }
    }

    pub fn secondary(store: Arc<CatalogStore>) -> Self {
        Self {
            store,
            role: NodeRole::Secondary,
            replication: None,
            applier: SyncApplier::new(),
            commit_order: Mutex::new(()),
        }
    }

    /// Wires a node from command-line configuration.
    pub fn from_config(config: &CatalogConfig) -> ShopResult<Self> {
        let store = match &config.data {
            Some(path) => CatalogStore::from_json_file(path)?,
            None => CatalogStore::with_default_books(),
        };
        let store = Arc::new(store);

        match config.role {
            NodeRole::Secondary => Ok(Self::secondary(store)),
            NodeRole::Primary => {
                let secondary_url = config.secondary_url.as_deref().ok_or_else(|| {
                    ShopError::InvalidConfig("a catalog primary needs --secondary-url".to_string())
                })?;
                let gateway_url = config.gateway_url.as_deref().ok_or_else(|| {
                    ShopError::InvalidConfig("a catalog primary needs --gateway-url".to_string())
                })?;

                let client = reqwest::Client::new();
                let timeout = config.sync.timeout();
                let sync_link =
                    HttpPeerLink::new(client.clone(), secondary_url, ENDPOINT_SYNC, timeout)?;
                let gateway_link =
                    HttpPeerLink::new(client, gateway_url, ENDPOINT_INVALIDATE, timeout)?;

                let policy = config.sync.retry_policy()?;
                tracing::info!(
                    "Propagating to {} ({} attempts, backoff {:?})",
                    secondary_url,
                    policy.max_attempts(),
                    policy.schedule()
                );

                Ok(Self::primary(
                    store,
                    PrimaryDuties {
                        propagator: Propagator::new(Arc::new(sync_link), policy),
                        invalidator: InvalidationBroadcaster::new(Arc::new(gateway_link)),
                    },
                ))
            }
        }
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    pub fn search(&self, topic: &str) -> ShopResult<Vec<BookSummary>> {
        self.store.search(topic)
    }

    pub fn info(&self, book_id: u64) -> ShopResult<BookInfo> {
        self.store.get(book_id)
    }

    pub fn decrement(&self, book_id: u64) -> ShopResult<Change<u32>> {
        self.commit(book_id, |store| {
            let committed = store.decrement(book_id)?;
            let mutation = Mutation::Decrement {
                quantity: committed.change.new,
            };
            Ok((mutation, committed))
        })
    }

    pub fn set_price(&self, book_id: u64, price: f64) -> ShopResult<Change<f64>> {
        self.commit(book_id, |store| {
            let committed = store.set_price(book_id, price)?;
            Ok((Mutation::SetPrice { price }, committed))
        })
    }

    pub fn adjust_stock(&self, book_id: u64, quantity_change: i64) -> ShopResult<Change<u32>> {
        self.commit(book_id, |store| {
            let committed = store.adjust_stock(book_id, quantity_change)?;
            Ok((Mutation::AdjustStock { quantity_change }, committed))
        })
    }

    /// Applies a write propagated by the primary.
    pub fn apply_sync(&self, descriptor: &MutationDescriptor) -> ShopResult<SyncOutcome> {
        self.applier.apply_mutation(&self.store, descriptor)
    }

    /// Waits until the propagation and invalidation of every write committed so
    /// far has finished. Returns at once on a secondary.
    pub async fn flush_replication(&self) {
        if let Some(replication) = &self.replication {
            replication.outbox.flush().await;
        }
    }

    /// Runs `write` and, on a primary, queues its propagation then its invalidation.
    /// The outcome of either never changes the result reported to the writer.
    fn commit<T, W>(&self, book_id: u64, write: W) -> ShopResult<Change<T>>
    where
        W: FnOnce(&CatalogStore) -> ShopResult<(Mutation, Committed<T>)>,
    {
        let _order = self.commit_order.lock();
        let (mutation, committed) = write(&self.store)?;

        if let Some(replication) = &self.replication {
            let duties = replication.duties.clone();
            let descriptor = MutationDescriptor::new(book_id, mutation);
            let topic = committed.topic.clone();

            replication.outbox.submit(async move {
                let what = format!("{} for book {}", descriptor.mutation.operation(), book_id);
                let request = SyncRequest::from(&descriptor);
                duties.propagator.propagate(&what, &request).await;
                duties
                    .invalidator
                    .broadcast(book_id, std::slice::from_ref(&topic))
                    .await;
            });
        }

        Ok(committed.change)
    }
}
