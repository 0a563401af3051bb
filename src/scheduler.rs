//! Periodic refresh task.
//!
//! Runs the pipeline, publishes the result, then waits for either the
//! interval to elapse or the shutdown signal, whichever comes first.

use crate::news::NewsStore;
use crate::pipeline::Pipeline;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct RefreshScheduler {
    pipeline: Arc<Pipeline>,
    store: Arc<NewsStore>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(pipeline: Arc<Pipeline>, store: Arc<NewsStore>, interval: Duration) -> Self {
        Self {
            pipeline,
            store,
            interval,
        }
    }

    /// Run one cycle on the blocking pool and publish its result.
    ///
    /// Returns `false` if the cycle failed; the previous dataset stays live.
    pub async fn refresh_once(&self) -> bool {
        tracing::info!("fetching news feed");
        let pipeline = Arc::clone(&self.pipeline);

        match tokio::task::spawn_blocking(move || pipeline.run_cycle()).await {
            Ok(Ok(items)) => {
                tracing::info!(items = items.len(), "published dataset");
                self.store.publish(items);
                true
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "feed fetch failed, keeping previous dataset");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "refresh task panicked, keeping previous dataset");
                false
            }
        }
    }

    /// Loop until `shutdown` turns `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "refresh loop started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.refresh_once().await;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("refresh loop stopped");
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
