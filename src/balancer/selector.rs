use crate::error::{ShopError, ShopResult};

use std::sync::atomic::{AtomicUsize, Ordering};

pub struct ReplicaSelector {
    name: String,
    endpoints: Vec<String>,
    cursor: AtomicUsize,
}

impl ReplicaSelector {
    /// Builds a selector over `endpoints`, in the given order.
    ///
    /// Trailing slashes are stripped so callers can append paths directly.
    /// An empty set is rejected here; `next` itself cannot fail.
    pub fn new(name: &str, endpoints: Vec<String>) -> ShopResult<Self> {
        if endpoints.is_empty() {
            return Err(ShopError::InvalidConfig(format!(
                "replica set '{}' must contain at least one endpoint",
                name
            )));
        }

        let endpoints = endpoints
            .into_iter()
            .map(|e| e.trim_end_matches('/').to_string())
            .collect();

        Ok(Self {
            name: name.to_string(),
            endpoints,
            cursor: AtomicUsize::new(0),
        })
    }

    pub fn next(&self) -> &str {
        let len = self.endpoints.len();
        // fetch_update retries on contention, so read-and-advance is a single step
        let idx = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| Some((i + 1) % len))
            .unwrap_or_else(|i| i);

        let endpoint = &self.endpoints[idx];
        tracing::debug!("Load balancer selected {} replica: {}", self.name, endpoint);
        endpoint
    }

    /// The designated primary: first endpoint of the set.
    pub fn primary(&self) -> &str {
        &self.endpoints[0]
    }
}
