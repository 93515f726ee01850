//! Catalog Service Module
//!
//! The replicated book catalog: an in-memory store plus the HTTP surface of a
//! catalog node.
//!
//! ## Core Concepts
//! - **Store**: `CatalogStore` owns one independent copy of every `CatalogItem`.
//!   Primary and secondary never share storage.
//! - **Primary**: Accepts writes (`decrement`, price and stock updates). Each committed
//!   write is propagated to the secondary and broadcast to the gateway as an invalidation.
//! - **Secondary**: Serves reads and applies propagated writes through `/sync`.
//!
//! ## Submodules
//! - **`types`**: Catalog records and their read projections.
//! - **`store`**: Concurrent in-memory store with the business rules of every write.
//! - **`service`**: `CatalogNode`, gluing the store to propagation and invalidation.
//! - **`protocol`**: Request DTOs of the write endpoints.
//! - **`handlers`**: Axum handlers and router.

pub mod handlers;
pub mod protocol;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;
