//! Write Propagation
//!
//! Runs at the primary after a local write committed. Delivers the write to the
//! secondary under a [`RetryPolicy`] and reports how it went; it never fails the
//! caller and never undoes the local write.

use super::link::{DeliveryError, PeerLink};
use super::policy::RetryPolicy;

use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum PropagationOutcome {
    Delivered { attempts: u32 },
    /// Every attempt failed; the secondary is behind the primary.
    Exhausted {
        attempts: u32,
        last_error: DeliveryError,
    },
}

impl PropagationOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, PropagationOutcome::Delivered { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PropagationOutcome::Delivered { attempts }
            | PropagationOutcome::Exhausted { attempts, .. } => *attempts,
        }
    }
}

pub struct Propagator {
    link: Arc<dyn PeerLink>,
    policy: RetryPolicy,
}

impl Propagator {
    pub fn new(link: Arc<dyn PeerLink>, policy: RetryPolicy) -> Self {
        Self { link, policy }
    }

    /// Pushes `payload` to the secondary, retrying with backoff.
    ///
    /// `what` names the write in logs (e.g. `decrement for book 3`).
    pub async fn propagate<T: Serialize + ?Sized>(&self, what: &str, payload: &T) -> PropagationOutcome {
        let payload = match serde_json::to_value(payload) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!("Cannot propagate {}: {}", what, e);
                return PropagationOutcome::Exhausted {
                    attempts: 0,
                    last_error: DeliveryError::Encode(e.to_string()),
                };
            }
        };

        let target = self.link.target();
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 1;

        loop {
            tracing::info!(
                "Propagating {} to {} (attempt {}/{})",
                what,
                target,
                attempt,
                max_attempts
            );

            let error = match self.link.deliver(&payload).await {
                Ok(_) => {
                    tracing::info!("Successfully propagated {}", what);
                    return PropagationOutcome::Delivered { attempts: attempt };
                }
                Err(e) => e,
            };

            tracing::warn!(
                "Propagation of {} failed on attempt {}/{}: {}",
                what,
                attempt,
                max_attempts,
                error
            );

            match self.policy.delay_after(attempt) {
                Some(delay) => {
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    tracing::error!(
                        "Failed to propagate {} after {} attempts; secondary {} is behind until reconciled",
                        what,
                        attempt,
                        target
                    );
                    return PropagationOutcome::Exhausted {
                        attempts: attempt,
                        last_error: error,
                    };
                }
            }
        }
    }
}
