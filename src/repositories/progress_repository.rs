use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{Database, PROGRESS_COLLECTION, SUBMISSIONS_COLLECTION},
    errors::AppResult,
    models::domain::{LessonProgress, QuizSubmission},
};

/// Durable storage for progress records and the append-only submission log.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn get_progress(
        &self,
        user_id: &str,
        lesson_id: &str,
    ) -> AppResult<Option<LessonProgress>>;

    /// Create-or-replace keyed on (user_id, lesson_id).
    async fn upsert_progress(&self, record: LessonProgress) -> AppResult<LessonProgress>;

    /// Progress rows of one user across a set of lessons.
    async fn progress_for_lessons(
        &self,
        user_id: &str,
        lesson_ids: &[String],
    ) -> AppResult<Vec<LessonProgress>>;

    /// Rows with a submitted project that has not been reviewed yet.
    async fn pending_reviews(&self) -> AppResult<Vec<LessonProgress>>;

    /// Append one attempt to the submission log. Never updates.
    async fn insert_submission(&self, submission: QuizSubmission) -> AppResult<QuizSubmission>;

    async fn find_submission(&self, id: &str) -> AppResult<Option<QuizSubmission>>;

    /// A user's attempts for a lesson, newest first.
    async fn submissions_for(
        &self,
        user_id: &str,
        lesson_id: &str,
    ) -> AppResult<Vec<QuizSubmission>>;
}

pub struct MongoProgressRepository {
    progress: Collection<LessonProgress>,
    submissions: Collection<QuizSubmission>,
}

impl MongoProgressRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            progress: db.get_collection(PROGRESS_COLLECTION),
            submissions: db.get_collection(SUBMISSIONS_COLLECTION),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for progress collections");

        let user_lesson_unique = IndexModel::builder()
            .keys(doc! { "user_id": 1, "lesson_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_lesson_unique".to_string())
                    .build(),
            )
            .build();
        self.progress.create_index(user_lesson_unique).await?;

        let submission_id_unique = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();
        self.submissions.create_index(submission_id_unique).await?;

        let submission_user_lesson = IndexModel::builder()
            .keys(doc! { "user_id": 1, "lesson_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_lesson_created".to_string())
                    .build(),
            )
            .build();
        self.submissions.create_index(submission_user_lesson).await?;

        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for MongoProgressRepository {
    async fn get_progress(
        &self,
        user_id: &str,
        lesson_id: &str,
    ) -> AppResult<Option<LessonProgress>> {
        let record = self
            .progress
            .find_one(doc! { "user_id": user_id, "lesson_id": lesson_id })
            .await?;
        Ok(record)
    }

    async fn upsert_progress(&self, record: LessonProgress) -> AppResult<LessonProgress> {
        self.progress
            .replace_one(
                doc! { "user_id": &record.user_id, "lesson_id": &record.lesson_id },
                &record,
            )
            .upsert(true)
            .await?;
        Ok(record)
    }

    async fn progress_for_lessons(
        &self,
        user_id: &str,
        lesson_ids: &[String],
    ) -> AppResult<Vec<LessonProgress>> {
        let records = self
            .progress
            .find(doc! { "user_id": user_id, "lesson_id": { "$in": lesson_ids } })
            .await?
            .try_collect()
            .await?;
        Ok(records)
    }

    async fn pending_reviews(&self) -> AppResult<Vec<LessonProgress>> {
        let records = self
            .progress
            .find(doc! {
                "project_repo_link": { "$exists": true, "$ne": null },
                "project_reviewed": false
            })
            .sort(doc! { "modified_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(records)
    }

    async fn insert_submission(&self, submission: QuizSubmission) -> AppResult<QuizSubmission> {
        self.submissions.insert_one(&submission).await?;
        Ok(submission)
    }

    async fn find_submission(&self, id: &str) -> AppResult<Option<QuizSubmission>> {
        let submission = self.submissions.find_one(doc! { "id": id }).await?;
        Ok(submission)
    }

    async fn submissions_for(
        &self,
        user_id: &str,
        lesson_id: &str,
    ) -> AppResult<Vec<QuizSubmission>> {
        let submissions = self
            .submissions
            .find(doc! { "user_id": user_id, "lesson_id": lesson_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(submissions)
    }
}
