//! Order Network Protocol

// --- API Endpoints ---

pub const ENDPOINT_BUY: &str = "buy";
pub const ENDPOINT_ORDERS: &str = "orders";

/// Title recorded when the catalog cannot tell us the real one.
pub const UNKNOWN_TITLE: &str = "Unknown";
