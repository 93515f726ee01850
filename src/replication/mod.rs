//! Replication Module
//!
//! Primary -> secondary write propagation and gateway cache invalidation.
//!
//! ## Core Concepts
//! - **Primary / Secondary**: Each store runs as exactly one primary and one secondary.
//!   Writes land at the primary; the secondary only changes through `/sync`.
//! - **Propagation**: After a committed local write the primary pushes a `MutationDescriptor`
//!   (or a whole order) to the secondary with bounded retries and exponential backoff.
//!   A write is never rolled back when propagation fails.
//! - **Sync**: The secondary applies propagated writes idempotently, so at-least-once delivery
//!   never double-applies a mutation or double-books an order.
//! - **Invalidation**: After every successful primary mutation the gateway is told which
//!   cache keys are stale.
//! - **Outbox**: Propagation and invalidation run on a per-node background worker, in
//!   commit order. The writer is answered as soon as the local write committed.
//!
//! There is no catch-up path: a secondary that misses every attempt of a propagation stays
//! behind until reconciled by hand.

pub mod invalidation;
pub mod link;
pub mod outbox;
pub mod policy;
pub mod propagator;
pub mod protocol;
pub mod sync;
pub mod types;
