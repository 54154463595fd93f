use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::{
    errors::AppResult,
    repositories::OutboxRepository,
    services::effects::EffectDispatcher,
};

const BATCH_SIZE: i64 = 32;

/// Background worker draining the outbox: polls pending entries, dispatches
/// each to its collaborator, and records the outcome. A failing entry is
/// retried on later passes until its retries run out, then parked as failed
/// where operators can see it.
#[derive(Clone)]
pub struct OutboxWorker {
    repo: Arc<dyn OutboxRepository>,
    dispatcher: Arc<EffectDispatcher>,
    poll_interval: Duration,
    worker_handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl OutboxWorker {
    pub fn new(
        repo: Arc<dyn OutboxRepository>,
        dispatcher: Arc<EffectDispatcher>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            repo,
            dispatcher,
            poll_interval,
            worker_handle: Arc::new(RwLock::new(None)),
        }
    }

    /// Drain one batch of pending entries. Returns how many were processed.
    pub async fn process_batch(&self) -> AppResult<usize> {
        let entries = self.repo.pending(BATCH_SIZE).await?;
        let count = entries.len();

        for entry in entries {
            match self.dispatcher.dispatch(&entry.effect).await {
                Ok(()) => {
                    self.repo.mark_delivered(&entry.id).await?;
                }
                Err(e) => {
                    log::warn!(
                        "Outbox delivery failed for entry {} (attempt {}): {}",
                        entry.id,
                        entry.attempts + 1,
                        e
                    );
                    self.repo.mark_failed(&entry.id, &e.to_string()).await?;
                }
            }
        }

        Ok(count)
    }

    pub async fn start(&self) {
        let worker = self.clone();
        let handle = tokio::spawn(async move {
            log::info!(
                "Outbox worker started, polling every {:?}",
                worker.poll_interval
            );
            loop {
                if let Err(e) = worker.process_batch().await {
                    log::error!("Outbox poll failed: {}", e);
                }
                tokio::time::sleep(worker.poll_interval).await;
            }
        });

        let mut guard = self.worker_handle.write().await;
        if let Some(old) = guard.replace(handle) {
            old.abort();
        }
    }

    pub async fn stop(&self) {
        let mut guard = self.worker_handle.write().await;
        if let Some(handle) = guard.take() {
            handle.abort();
            log::info!("Outbox worker stopped");
        }
    }
}
