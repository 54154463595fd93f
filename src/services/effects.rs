use std::sync::Arc;

use async_trait::async_trait;
use mongodb::Collection;

use crate::{
    db::{Database, NOTIFICATIONS_COLLECTION},
    errors::{AppError, AppResult},
    models::domain::{Notification, OutboxEntry, SideEffect},
    repositories::OutboxRepository,
};

/// Accepts side effects from the request path. Implementations must be cheap;
/// actual delivery happens out of band.
#[async_trait]
pub trait EffectQueue: Send + Sync {
    async fn enqueue(&self, effect: SideEffect) -> AppResult<()>;
}

/// Queue implementation backed by the durable outbox collection.
pub struct OutboxQueue {
    repo: Arc<dyn OutboxRepository>,
    max_attempts: i32,
}

impl OutboxQueue {
    pub fn new(repo: Arc<dyn OutboxRepository>, max_attempts: i32) -> Self {
        Self { repo, max_attempts }
    }
}

#[async_trait]
impl EffectQueue for OutboxQueue {
    async fn enqueue(&self, effect: SideEffect) -> AppResult<()> {
        self.repo
            .enqueue(OutboxEntry::new(effect, self.max_attempts))
            .await?;
        Ok(())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: &str, title: &str, body: &str) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StreakTracker: Send + Sync {
    async fn credit(&self, user_id: &str) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectGrader: Send + Sync {
    async fn request_grade(
        &self,
        user_id: &str,
        lesson_id: &str,
        repo_link: &str,
    ) -> AppResult<()>;
}

/// Routes a drained outbox entry to the collaborator that handles it.
pub struct EffectDispatcher {
    notifier: Arc<dyn Notifier>,
    streaks: Arc<dyn StreakTracker>,
    grader: Arc<dyn ProjectGrader>,
}

impl EffectDispatcher {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        streaks: Arc<dyn StreakTracker>,
        grader: Arc<dyn ProjectGrader>,
    ) -> Self {
        Self {
            notifier,
            streaks,
            grader,
        }
    }

    pub async fn dispatch(&self, effect: &SideEffect) -> AppResult<()> {
        match effect {
            SideEffect::StreakCredit { user_id } => self.streaks.credit(user_id).await,
            SideEffect::StudentNotification {
                user_id,
                title,
                body,
            } => self.notifier.notify(user_id, title, body).await,
            SideEffect::ProjectGrade {
                user_id,
                lesson_id,
                repo_link,
            } => self.grader.request_grade(user_id, lesson_id, repo_link).await,
        }
    }
}

/// Notifier writing in-app notification documents. Email fan-out is handled
/// by a separate delivery service watching the same collection.
pub struct MongoNotifier {
    collection: Collection<Notification>,
}

impl MongoNotifier {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection(NOTIFICATIONS_COLLECTION),
        }
    }
}

#[async_trait]
impl Notifier for MongoNotifier {
    async fn notify(&self, user_id: &str, title: &str, body: &str) -> AppResult<()> {
        self.collection
            .insert_one(&Notification::new(user_id, title, body))
            .await?;
        Ok(())
    }
}

/// Grader that posts the submission to an external grading webhook. Without a
/// configured URL the request is skipped, which keeps local development
/// working with no grader running.
pub struct WebhookGrader {
    client: reqwest::Client,
    url: Option<String>,
}

impl WebhookGrader {
    pub fn new(url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl ProjectGrader for WebhookGrader {
    async fn request_grade(
        &self,
        user_id: &str,
        lesson_id: &str,
        repo_link: &str,
    ) -> AppResult<()> {
        let Some(url) = &self.url else {
            log::info!(
                "No grader webhook configured, skipping grade request for user {} lesson {}",
                user_id,
                lesson_id
            );
            return Ok(());
        };

        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({
                "user_id": user_id,
                "lesson_id": lesson_id,
                "repo_link": repo_link,
            }))
            .send()
            .await
            .map_err(|e| AppError::InternalError(format!("Grader webhook error: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::InternalError(format!(
                "Grader webhook returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
