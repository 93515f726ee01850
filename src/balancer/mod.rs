//! Replica Selection Module
//!
//! Round-robin choice over a fixed, ordered set of replica endpoints.
//!
//! ## Core Concepts
//! - **ReplicaSet**: The ordered endpoint list of one resource type (catalog or order).
//!   The set never changes at runtime and is never empty.
//! - **Cursor**: A shared index advanced atomically on every selection, so N consecutive
//!   picks return every endpoint exactly once, whatever the interleaving of callers.

pub mod selector;
