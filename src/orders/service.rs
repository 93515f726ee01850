use super::protocol::UNKNOWN_TITLE;
use super::store::OrderStore;
use super::types::Order;
use crate::catalog::protocol::{ENDPOINT_DECREMENT, ENDPOINT_INFO};
use crate::catalog::types::BookInfo;
use crate::config::OrderConfig;
use crate::error::{ShopError, ShopResult};
use crate::http::endpoint_url;
use crate::protocol::ApiResponse;
use crate::replication::link::HttpPeerLink;
use crate::replication::outbox::Outbox;
use crate::replication::propagator::Propagator;
use crate::replication::protocol::{ENDPOINT_SYNC, OrderSyncRequest};
use crate::replication::sync::SyncApplier;
use crate::replication::types::{NodeRole, SyncOutcome};

use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;

/// Purchase collaborators of an order primary.
pub struct PurchaseDuties {
    pub catalog_url: String,
    pub propagator: Propagator,
}

struct Purchasing {
    duties: Arc<PurchaseDuties>,
    outbox: Outbox,
}

/// One order replica.
pub struct OrderNode {
    store: Arc<OrderStore>,
    role: NodeRole,
    purchasing: Option<Purchasing>,
    applier: SyncApplier,
    client: reqwest::Client,
    timeout: Duration,
}

impl OrderNode {
    /// Must be called from within a Tokio runtime: starts the replication outbox.
    pub fn primary(store: Arc<OrderStore>, duties: PurchaseDuties, timeout: Duration) -> Self {
        Self {
            store,
            role: NodeRole::Primary,
            purchasing: Some(Purchasing {
                duties: Arc::new(duties),
                outbox: Outbox::spawn("order"),
            }),
            applier: SyncApplier::new(),
            client: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn secondary(store: Arc<OrderStore>) -> Self {
        Self {
            store,
            role: NodeRole::Secondary,
            purchasing: None,
            applier: SyncApplier::new(),
            client: reqwest::Client::new(),
            timeout: crate::http::DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(config: &OrderConfig) -> ShopResult<Self> {
        let store = Arc::new(OrderStore::new());

        match config.role {
            NodeRole::Secondary => Ok(Self::secondary(store)),
            NodeRole::Primary => {
                let secondary_url = config.secondary_url.as_deref().ok_or_else(|| {
                    ShopError::InvalidConfig("an order primary needs --secondary-url".to_string())
                })?;
                let catalog_url = config.catalog_url.clone().ok_or_else(|| {
                    ShopError::InvalidConfig("an order primary needs --catalog-url".to_string())
                })?;

                let timeout = config.sync.timeout();
                let link = HttpPeerLink::new(
                    reqwest::Client::new(),
                    secondary_url,
                    ENDPOINT_SYNC,
                    timeout,
                )?;

                let policy = config.sync.retry_policy()?;
                tracing::info!(
                    "Propagating orders to {} ({} attempts, backoff {:?})",
                    secondary_url,
                    policy.max_attempts(),
                    policy.schedule()
                );

                Ok(Self::primary(
                    store,
                    PurchaseDuties {
                        catalog_url,
                        propagator: Propagator::new(Arc::new(link), policy),
                    },
                    timeout,
                ))
            }
        }
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn store(&self) -> &Arc<OrderStore> {
        &self.store
    }

    /// Buys one copy of `book_id`.
    ///
    /// Stock is taken at the catalog primary first; the order is only recorded once
    /// the catalog confirmed. The recorded order is then queued for propagation to
    /// the secondary; the buyer does not wait for it.
    pub async fn buy(&self, book_id: u64) -> ShopResult<Order> {
        let purchasing = self.purchasing.as_ref().ok_or_else(|| {
            ShopError::Internal("purchases are only accepted by the order primary".to_string())
        })?;
        let duties = &purchasing.duties;
        let id = book_id.to_string();

        let url = endpoint_url(&duties.catalog_url, &[ENDPOINT_DECREMENT, &id])?;
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::BAD_REQUEST => {
                return Err(ShopError::BusinessRule("Book out of stock".to_string()));
            }
            StatusCode::NOT_FOUND => {
                return Err(ShopError::NotFound("Book not found".to_string()));
            }
            status => {
                return Err(ShopError::Internal(format!(
                    "Failed to process order: catalog answered {}",
                    status
                )));
            }
        }

        let title = self.fetch_title(&duties.catalog_url, &id).await;
        let order = self.store.record(book_id, title);

        let job_duties = duties.clone();
        let what = format!("order {}", order.order_id);
        let request = OrderSyncRequest {
            order: Some(order.clone()),
        };
        purchasing.outbox.submit(async move {
            job_duties.propagator.propagate(&what, &request).await;
        });

        Ok(order)
    }

    /// Waits until every order recorded so far has been propagated (or given up
    /// on). Returns at once on a secondary.
    pub async fn flush_replication(&self) {
        if let Some(purchasing) = &self.purchasing {
            purchasing.outbox.flush().await;
        }
    }

    pub fn order(&self, order_id: u64) -> ShopResult<Order> {
        self.store.get(order_id)
    }

    pub fn apply_sync(&self, order: Order) -> ShopResult<SyncOutcome> {
        self.applier.apply_order(&self.store, order)
    }

    /// Title snapshot for a new order. A failed lookup does not fail the purchase.
    async fn fetch_title(&self, catalog_url: &str, id: &str) -> String {
        let url = match endpoint_url(catalog_url, &[ENDPOINT_INFO, id]) {
            Ok(url) => url,
            Err(_) => return UNKNOWN_TITLE.to_string(),
        };

        let response = match self.client.get(url).timeout(self.timeout).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::warn!("Title lookup for book {} answered {}", id, r.status());
                return UNKNOWN_TITLE.to_string();
            }
            Err(e) => {
                tracing::warn!("Title lookup for book {} failed: {}", id, e);
                return UNKNOWN_TITLE.to_string();
            }
        };

        response
            .json::<ApiResponse>()
            .await
            .ok()
            .and_then(|body| body.data)
            .and_then(|data| serde_json::from_value::<BookInfo>(data).ok())
            .map(|info| info.title)
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
    }
}
