use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use academy_server::{
    errors::{AppError, AppResult},
    models::domain::{OutboxEntry, OutboxStatus, SideEffect, StudyStreak},
    repositories::{OutboxRepository, StreakRepository},
    services::{
        effects::{EffectQueue, Notifier, OutboxQueue, ProjectGrader, StreakTracker},
        EffectDispatcher, OutboxWorker, StreakService,
    },
};

struct InMemoryOutboxRepository {
    entries: Arc<RwLock<Vec<OutboxEntry>>>,
}

impl InMemoryOutboxRepository {
    fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    async fn entry(&self, id: &str) -> Option<OutboxEntry> {
        self.entries.read().await.iter().find(|e| e.id == id).cloned()
    }

    async fn all(&self) -> Vec<OutboxEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl OutboxRepository for InMemoryOutboxRepository {
    async fn enqueue(&self, entry: OutboxEntry) -> AppResult<OutboxEntry> {
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn pending(&self, limit: i64) -> AppResult<Vec<OutboxEntry>> {
        let entries = self.entries.read().await;
        let mut pending: Vec<_> = entries
            .iter()
            .filter(|e| e.status == OutboxStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        pending.truncate(limit as usize);
        Ok(pending)
    }

    async fn mark_delivered(&self, id: &str) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
            entry.status = OutboxStatus::Delivered;
            entry.delivered_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn mark_failed(&self, id: &str, error: &str) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
            entry.attempts += 1;
            entry.last_error = Some(error.to_string());
            entry.status = if entry.attempts >= entry.max_attempts {
                OutboxStatus::Failed
            } else {
                OutboxStatus::Pending
            };
        }
        Ok(())
    }
}

struct RecordingNotifier {
    delivered: Arc<RwLock<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self {
            delivered: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, user_id: &str, title: &str, _body: &str) -> AppResult<()> {
        self.delivered
            .write()
            .await
            .push((user_id.to_string(), title.to_string()));
        Ok(())
    }
}

/// Streak tracker failing its first `failures` calls, then succeeding.
struct FlakyStreakTracker {
    failures_left: AtomicI32,
    calls: AtomicI32,
}

impl FlakyStreakTracker {
    fn new(failures: i32) -> Self {
        Self {
            failures_left: AtomicI32::new(failures),
            calls: AtomicI32::new(0),
        }
    }

    fn call_count(&self) -> i32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreakTracker for FlakyStreakTracker {
    async fn credit(&self, _user_id: &str) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failures_left.fetch_sub(1, Ordering::SeqCst) > 0 {
            return Err(AppError::DatabaseError("streak store unavailable".into()));
        }
        Ok(())
    }
}

struct NoopGrader;

#[async_trait]
impl ProjectGrader for NoopGrader {
    async fn request_grade(&self, _: &str, _: &str, _: &str) -> AppResult<()> {
        Ok(())
    }
}

fn make_worker(
    repo: Arc<InMemoryOutboxRepository>,
    notifier: Arc<RecordingNotifier>,
    streaks: Arc<FlakyStreakTracker>,
) -> OutboxWorker {
    let dispatcher = Arc::new(EffectDispatcher::new(notifier, streaks, Arc::new(NoopGrader)));
    OutboxWorker::new(repo, dispatcher, Duration::from_millis(10))
}

#[tokio::test]
async fn delivered_entries_leave_the_queue() {
    let repo = Arc::new(InMemoryOutboxRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let worker = make_worker(repo.clone(), notifier.clone(), Arc::new(FlakyStreakTracker::new(0)));

    let queue = OutboxQueue::new(repo.clone(), 3);
    queue
        .enqueue(SideEffect::StudentNotification {
            user_id: "alice".to_string(),
            title: "Project reviewed".to_string(),
            body: "You scored 85".to_string(),
        })
        .await
        .unwrap();

    let processed = worker.process_batch().await.unwrap();
    assert_eq!(processed, 1);

    let delivered = notifier.delivered.read().await;
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].0, "alice");

    let entries = repo.all().await;
    assert_eq!(entries[0].status, OutboxStatus::Delivered);
    assert!(entries[0].delivered_at.is_some());

    assert!(repo.pending(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn failing_entries_are_retried_then_parked() {
    let repo = Arc::new(InMemoryOutboxRepository::new());
    let streaks = Arc::new(FlakyStreakTracker::new(i32::MAX));
    let worker = make_worker(repo.clone(), Arc::new(RecordingNotifier::new()), streaks.clone());

    let queue = OutboxQueue::new(repo.clone(), 3);
    queue
        .enqueue(SideEffect::StreakCredit {
            user_id: "alice".to_string(),
        })
        .await
        .unwrap();
    let id = repo.all().await[0].id.clone();

    for _ in 0..3 {
        worker.process_batch().await.unwrap();
    }

    let entry = repo.entry(&id).await.unwrap();
    assert_eq!(entry.status, OutboxStatus::Failed);
    assert_eq!(entry.attempts, 3);
    assert!(entry.last_error.is_some());

    // A parked entry is no longer attempted.
    worker.process_batch().await.unwrap();
    assert_eq!(streaks.call_count(), 3);
}

#[tokio::test]
async fn transient_failure_recovers_on_the_next_pass() {
    let repo = Arc::new(InMemoryOutboxRepository::new());
    let streaks = Arc::new(FlakyStreakTracker::new(1));
    let worker = make_worker(repo.clone(), Arc::new(RecordingNotifier::new()), streaks.clone());

    let queue = OutboxQueue::new(repo.clone(), 3);
    queue
        .enqueue(SideEffect::StreakCredit {
            user_id: "alice".to_string(),
        })
        .await
        .unwrap();
    let id = repo.all().await[0].id.clone();

    worker.process_batch().await.unwrap();
    let entry = repo.entry(&id).await.unwrap();
    assert_eq!(entry.status, OutboxStatus::Pending);
    assert_eq!(entry.attempts, 1);

    worker.process_batch().await.unwrap();
    let entry = repo.entry(&id).await.unwrap();
    assert_eq!(entry.status, OutboxStatus::Delivered);
    assert_eq!(streaks.call_count(), 2);
}

struct InMemoryStreakRepository {
    streaks: Arc<RwLock<Option<StudyStreak>>>,
}

impl InMemoryStreakRepository {
    fn new() -> Self {
        Self {
            streaks: Arc::new(RwLock::new(None)),
        }
    }
}

#[async_trait]
impl StreakRepository for InMemoryStreakRepository {
    async fn get_streak(&self, _user_id: &str) -> AppResult<Option<StudyStreak>> {
        Ok(self.streaks.read().await.clone())
    }

    async fn upsert_streak(&self, streak: StudyStreak) -> AppResult<StudyStreak> {
        *self.streaks.write().await = Some(streak.clone());
        Ok(streak)
    }
}

#[tokio::test]
async fn a_second_credit_on_the_same_day_does_not_double_count() {
    let repo = Arc::new(InMemoryStreakRepository::new());
    let service = StreakService::new(repo);

    service.credit("alice").await.unwrap();
    service.credit("alice").await.unwrap();

    let streak = service.current("alice").await.unwrap();
    assert_eq!(streak.current_streak, 1);
    assert_eq!(streak.longest_streak, 1);
}

#[tokio::test]
async fn users_without_credits_have_a_zeroed_streak() {
    let repo = Arc::new(InMemoryStreakRepository::new());
    let service = StreakService::new(repo);

    let streak = service.current("nobody").await.unwrap();
    assert_eq!(streak.current_streak, 0);
    assert_eq!(streak.longest_streak, 0);
    assert!(streak.last_credit_date.is_none());
}
