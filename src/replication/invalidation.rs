use super::link::PeerLink;
use super::protocol::InvalidateRequest;

use std::sync::Arc;

/// Tells the gateway which cached responses a primary mutation made stale.
///
/// Single attempt: a lost broadcast only leaves a stale entry until LRU eviction,
/// and the writer has already been acknowledged.
pub struct InvalidationBroadcaster {
    link: Arc<dyn PeerLink>,
}

impl InvalidationBroadcaster {
    pub fn new(link: Arc<dyn PeerLink>) -> Self {
        Self { link }
    }

    /// Asks the gateway to drop `info:<book_id>` and `search:<topic>` for every topic.
    ///
    /// Returns the keys the gateway reported as removed, or `None` if the gateway
    /// could not be reached or refused the request.
    pub async fn broadcast(&self, book_id: u64, topics: &[String]) -> Option<Vec<String>> {
        let request = InvalidateRequest {
            book_id: Some(book_id),
            topics: topics.to_vec(),
        };

        let payload = match serde_json::to_value(&request) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!("Failed to encode invalidation for book {}: {}", book_id, e);
                return None;
            }
        };

        tracing::info!(
            "Sending cache invalidation for book {}, topics: {:?}",
            book_id,
            topics
        );

        match self.link.deliver(&payload).await {
            Ok(ack) => {
                let removed = ack.invalidated_keys.unwrap_or_default();
                tracing::info!(
                    "Successfully invalidated cache for book {} ({} keys removed)",
                    book_id,
                    removed.len()
                );
                Some(removed)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to invalidate cache at {} for book {}: {}",
                    self.link.target(),
                    book_id,
                    e
                );
                None
            }
        }
    }
}
