use crate::balancer::selector::ReplicaSelector;
use crate::cache::result_cache::ResultCache;
use crate::cache::types::{CacheStats, info_key, search_key};
use crate::catalog::protocol::{
    ENDPOINT_INFO, ENDPOINT_SEARCH, ENDPOINT_UPDATE, SEGMENT_PRICE, SEGMENT_STOCK,
};
use crate::config::GatewayConfig;
use crate::error::{ShopError, ShopResult};
use crate::http::endpoint_url;
use crate::orders::protocol::{ENDPOINT_BUY, ENDPOINT_ORDERS};
use crate::protocol::ApiResponse;

use reqwest::{Method, StatusCode};
use std::time::Duration;

/// Answer of a downstream node, relayed to the client unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Downstream {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

pub struct Gateway {
    catalog: ReplicaSelector,
    orders: ReplicaSelector,
    cache: ResultCache<serde_json::Value>,
    client: reqwest::Client,
    timeout: Duration,
}

impl Gateway {
    /// The first endpoint of each replica set is its primary.
    pub fn new(
        catalog: ReplicaSelector,
        orders: ReplicaSelector,
        cache: ResultCache<serde_json::Value>,
        timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            orders,
            cache,
            client: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> ShopResult<Self> {
        Ok(Self::new(
            ReplicaSelector::new("catalog", config.catalog_replicas.clone())?,
            ReplicaSelector::new("order", config.order_replicas.clone())?,
            ResultCache::new(config.cache_capacity)?,
            Duration::from_millis(config.timeout_ms),
        ))
    }

    // --- Read path ---

    pub async fn search(&self, topic: &str) -> ShopResult<Downstream> {
        self.read_through(search_key(topic), &[ENDPOINT_SEARCH, topic])
            .await
    }

    pub async fn info(&self, book_id: u64) -> ShopResult<Downstream> {
        let id = book_id.to_string();
        self.read_through(info_key(book_id), &[ENDPOINT_INFO, &id])
            .await
    }

    /// Order lookups are spread over the order replicas and never cached.
    pub async fn order(&self, order_id: u64) -> ShopResult<Downstream> {
        let id = order_id.to_string();
        let replica = self.orders.next();
        self.call(Method::GET, replica, &[ENDPOINT_ORDERS, &id], None)
            .await
    }

    async fn read_through(&self, key: String, segments: &[&str]) -> ShopResult<Downstream> {
        if let Some(body) = self.cache.get(&key) {
            return Ok(Downstream {
                status: StatusCode::OK,
                body,
            });
        }

        let replica = self.catalog.next();
        let answer = self.call(Method::GET, replica, segments, None).await?;

        if answer.status == StatusCode::OK && answer.body["success"] == true {
            self.cache.put(&key, answer.body.clone());
        }

        Ok(answer)
    }

    // --- Write path ---

    pub async fn buy(&self, book_id: u64) -> ShopResult<Downstream> {
        let id = book_id.to_string();
        self.call(Method::POST, self.orders.primary(), &[ENDPOINT_BUY, &id], None)
            .await
    }

    pub async fn update_price(&self, book_id: u64, body: serde_json::Value) -> ShopResult<Downstream> {
        let id = book_id.to_string();
        self.call(
            Method::PUT,
            self.catalog.primary(),
            &[ENDPOINT_UPDATE, &id, SEGMENT_PRICE],
            Some(body),
        )
        .await
    }

    pub async fn update_stock(&self, book_id: u64, body: serde_json::Value) -> ShopResult<Downstream> {
        let id = book_id.to_string();
        self.call(
            Method::PUT,
            self.catalog.primary(),
            &[ENDPOINT_UPDATE, &id, SEGMENT_STOCK],
            Some(body),
        )
        .await
    }

    // --- Cache intake ---

    /// Drops `info:<book_id>` and `search:<topic>` for every topic.
    ///
    /// Returns only the keys that were cached and are now gone.
    pub fn invalidate(&self, book_id: Option<u64>, topics: &[String]) -> Vec<String> {
        let keys = book_id
            .map(info_key)
            .into_iter()
            .chain(topics.iter().map(|topic| search_key(topic)));

        let removed: Vec<String> = keys.filter(|key| self.cache.invalidate(key)).collect();

        tracing::info!(
            "Cache invalidation request: book_id={:?}, topics={:?}, invalidated={:?}",
            book_id,
            topics,
            removed
        );
        removed
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &ResultCache<serde_json::Value> {
        &self.cache
    }

    async fn call(
        &self,
        method: Method,
        base: &str,
        segments: &[&str],
        body: Option<serde_json::Value>,
    ) -> ShopResult<Downstream> {
        let url = endpoint_url(base, segments)?;
        tracing::debug!("Forwarding {} {}", method, url);

        let mut request = self.client.request(method, url).timeout(self.timeout);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let raw = response.bytes().await?;

        // A replica answering outside the envelope (e.g. a plain-text 404 for an
        // unknown route) keeps its status; only transport failures become 503
        let body = match serde_json::from_slice::<serde_json::Value>(&raw) {
            Ok(body) => body,
            Err(_) => {
                tracing::warn!("{} answered {} without a JSON body", base, status);
                let envelope = ApiResponse::failure(format!(
                    "Downstream answered {} without a JSON body",
                    status
                ));
                serde_json::to_value(envelope).map_err(|e| ShopError::Internal(e.to_string()))?
            }
        };

        Ok(Downstream { status, body })
    }
}
