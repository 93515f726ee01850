//! Catalog Network Protocol
//!
//! Path segments of the catalog endpoints and the bodies of its write requests.
//! Bodies are decoded once, at the handler boundary; a missing field or a value of
//! the wrong type (e.g. a fractional `quantity_change`) is a validation failure.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

pub const ENDPOINT_SEARCH: &str = "search";
pub const ENDPOINT_INFO: &str = "info";
/// Internal endpoint the order primary calls while processing a purchase.
pub const ENDPOINT_DECREMENT: &str = "decrement";
pub const ENDPOINT_UPDATE: &str = "update";
pub const SEGMENT_PRICE: &str = "price";
pub const SEGMENT_STOCK: &str = "stock";

// --- Data Transfer Objects ---

/// Body of `PUT /update/{id}/price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceUpdateRequest {
    pub price: f64,
}

/// Body of `PUT /update/{id}/stock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockUpdateRequest {
    pub quantity_change: i64,
}
