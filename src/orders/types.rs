use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed purchase. Replicated as a whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: u64,
    pub book_id: u64,
    /// Title at the time of purchase.
    pub book_title: String,
    pub timestamp: DateTime<Utc>,
}
