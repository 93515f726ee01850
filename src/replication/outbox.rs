//! Replication Outbox
//!
//! Post-commit work of a primary (propagation, invalidation) runs here, off the
//! request path, so a slow or hung peer never holds the writer. Jobs run one at a
//! time in submission order: the secondary receives writes in commit order.

use std::future::Future;
use std::pin::Pin;
use tokio::sync::{mpsc, oneshot};

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

pub struct Outbox {
    name: String,
    jobs: mpsc::UnboundedSender<Job>,
}

impl Outbox {
    /// Starts the background worker. Must be called from within a Tokio runtime.
    pub fn spawn(name: &str) -> Self {
        let (jobs, mut queue) = mpsc::unbounded_channel::<Job>();
        let worker = name.to_string();

        tokio::spawn(async move {
            while let Some(job) = queue.recv().await {
                job.await;
            }
            tracing::debug!("Replication outbox {} stopped", worker);
        });

        Self {
            name: name.to_string(),
            jobs,
        }
    }

    pub fn submit<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.jobs.send(Box::pin(job)).is_err() {
            tracing::error!("Replication outbox {} is closed, job dropped", self.name);
        }
    }

    /// Resolves once every job submitted before this call has finished.
    pub async fn flush(&self) {
        let (done, finished) = oneshot::channel();
        self.submit(async move {
            let _ = done.send(());
        });
        let _ = finished.await;
    }
}
