//! Result Cache Module
//!
//! A bounded, least-recently-used cache for read responses served by the gateway.
//!
//! ## Core Concepts
//! - **Keys**: Namespaced strings, `search:<topic>` and `info:<id>`.
//! - **Recency**: Reads (`get`) and writes (`put`) promote an entry to most-recently-used;
//!   growing past capacity evicts the least-recently-used entry.
//! - **Invalidation**: Explicit removal driven by mutations at the primary nodes.
//! - **Stats**: Process-lifetime hit/miss/invalidation counters.
//!
//! Every operation runs under a single lock, so an invalidation that returned
//! happens-before any later `get` of the same key.

pub mod result_cache;
pub mod types;
