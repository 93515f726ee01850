//! Gateway Module
//!
//! The client-facing front of the shop.
//!
//! ## Responsibilities
//! - **Reads** (`search`, `info`): Read-through `ResultCache`; on a miss a catalog replica is
//!   chosen round-robin, and only a 200 answer is cached. No failover on read.
//! - **Writes** (`buy`, price and stock updates): Forwarded as-is to the designated primary.
//!   The gateway never touches its cache on the write path; stale keys are dropped when the
//!   primary's invalidation broadcast arrives at `/invalidate-cache`.
//! - **Stats**: `/cache-stats` reports the cache counters.
//!
//! A downstream timeout or connection failure is answered with 503.

pub mod handlers;
pub mod protocol;
pub mod service;
