use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{Database, STREAKS_COLLECTION},
    errors::AppResult,
    models::domain::StudyStreak,
};

#[async_trait]
pub trait StreakRepository: Send + Sync {
    async fn get_streak(&self, user_id: &str) -> AppResult<Option<StudyStreak>>;
    async fn upsert_streak(&self, streak: StudyStreak) -> AppResult<StudyStreak>;
}

pub struct MongoStreakRepository {
    collection: Collection<StudyStreak>,
}

impl MongoStreakRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection(STREAKS_COLLECTION),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let user_unique = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_unique".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(user_unique).await?;
        Ok(())
    }
}

#[async_trait]
impl StreakRepository for MongoStreakRepository {
    async fn get_streak(&self, user_id: &str) -> AppResult<Option<StudyStreak>> {
        let streak = self.collection.find_one(doc! { "user_id": user_id }).await?;
        Ok(streak)
    }

    async fn upsert_streak(&self, streak: StudyStreak) -> AppResult<StudyStreak> {
        self.collection
            .replace_one(doc! { "user_id": &streak.user_id }, &streak)
            .upsert(true)
            .await?;
        Ok(streak)
    }
}
