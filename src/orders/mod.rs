//! Order Service Module
//!
//! Purchase processing and the replicated order log.
//!
//! ## Core Concepts
//! - **Purchase**: The order primary takes one unit out of stock at the catalog primary,
//!   snapshots the title and records an order under the next order id.
//! - **Replication**: Every recorded order is propagated whole to the order secondary,
//!   which deduplicates by order id.

pub mod handlers;
pub mod protocol;
pub mod service;
pub mod store;
pub mod types;
