//! Replicated Book Shop Library
//!
//! Core modules of a small shop: replicated catalog and order stores fronted by a
//! caching gateway. The binary (`main.rs`) runs any of the roles.
//!
//! ## Architecture Modules
//! - **`balancer`**: Round-robin replica selection with an atomic shared cursor.
//! - **`cache`**: Bounded LRU result cache with hit/miss/invalidation counters.
//! - **`gateway`**: Read-through caching for reads, forwarding to primaries for writes,
//!   and the invalidation intake.
//! - **`replication`**: Primary -> secondary propagation with bounded retry and backoff,
//!   idempotent sync on the secondary, and invalidation broadcasts to the gateway.
//! - **`catalog`**: The book catalog store and the catalog node HTTP surface.
//! - **`orders`**: The purchase workflow and the order log.

pub mod balancer;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod orders;
pub mod protocol;
pub mod replication;
