use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    errors::AppResult,
    models::domain::StudyStreak,
    repositories::StreakRepository,
    services::effects::StreakTracker,
};

pub struct StreakService {
    repo: Arc<dyn StreakRepository>,
}

impl StreakService {
    pub fn new(repo: Arc<dyn StreakRepository>) -> Self {
        Self { repo }
    }

    /// The user's streak, or a zeroed one if they have never completed a
    /// lesson.
    pub async fn current(&self, user_id: &str) -> AppResult<StudyStreak> {
        let streak = self
            .repo
            .get_streak(user_id)
            .await?
            .unwrap_or_else(|| StudyStreak::new(user_id));
        Ok(streak)
    }
}

#[async_trait]
impl StreakTracker for StreakService {
    async fn credit(&self, user_id: &str) -> AppResult<()> {
        let mut streak = self
            .repo
            .get_streak(user_id)
            .await?
            .unwrap_or_else(|| StudyStreak::new(user_id));

        if streak.credit(Utc::now().date_naive()) {
            self.repo.upsert_streak(streak).await?;
        }
        Ok(())
    }
}
