use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{Database, OUTBOX_COLLECTION},
    errors::AppResult,
    models::domain::{OutboxEntry, OutboxStatus},
};

/// Durable queue of side effects awaiting delivery. Entries move
/// pending -> delivered, or pending -> failed once retries are exhausted.
#[async_trait]
pub trait OutboxRepository: Send + Sync {
    async fn enqueue(&self, entry: OutboxEntry) -> AppResult<OutboxEntry>;

    /// Oldest pending entries, up to `limit`.
    async fn pending(&self, limit: i64) -> AppResult<Vec<OutboxEntry>>;

    async fn mark_delivered(&self, id: &str) -> AppResult<()>;

    /// Record one failed delivery attempt; parks the entry as failed once
    /// `attempts` reaches `max_attempts`.
    async fn mark_failed(&self, id: &str, error: &str) -> AppResult<()>;
}

pub struct MongoOutboxRepository {
    collection: Collection<OutboxEntry>,
}

impl MongoOutboxRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection(OUTBOX_COLLECTION),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let status_created = IndexModel::builder()
            .keys(doc! { "status": 1, "created_at": 1 })
            .options(
                IndexOptions::builder()
                    .name("status_created".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(status_created).await?;
        Ok(())
    }
}

#[async_trait]
impl OutboxRepository for MongoOutboxRepository {
    async fn enqueue(&self, entry: OutboxEntry) -> AppResult<OutboxEntry> {
        self.collection.insert_one(&entry).await?;
        Ok(entry)
    }

    async fn pending(&self, limit: i64) -> AppResult<Vec<OutboxEntry>> {
        let entries = self
            .collection
            .find(doc! { "status": "pending" })
            .sort(doc! { "created_at": 1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(entries)
    }

    async fn mark_delivered(&self, id: &str) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "id": id },
                doc! { "$set": {
                    "status": "delivered",
                    "delivered_at": Utc::now().to_rfc3339()
                } },
            )
            .await?;
        Ok(())
    }

    async fn mark_failed(&self, id: &str, error: &str) -> AppResult<()> {
        let Some(entry) = self.collection.find_one(doc! { "id": id }).await? else {
            return Ok(());
        };

        let attempts = entry.attempts + 1;
        let status = if attempts >= entry.max_attempts {
            OutboxStatus::Failed
        } else {
            OutboxStatus::Pending
        };
        let status_str = match status {
            OutboxStatus::Failed => "failed",
            _ => "pending",
        };

        self.collection
            .update_one(
                doc! { "id": id },
                doc! { "$set": {
                    "attempts": attempts,
                    "status": status_str,
                    "last_error": error
                } },
            )
            .await?;
        Ok(())
    }
}
