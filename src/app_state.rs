use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoContentRepository, MongoOutboxRepository, MongoProgressRepository,
        MongoStreakRepository, OutboxRepository,
    },
    services::{
        EffectDispatcher, MongoNotifier, OutboxQueue, OutboxWorker, ProgressService,
        StreakService, WebhookGrader,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub progress_service: Arc<ProgressService>,
    pub streak_service: Arc<StreakService>,
    pub outbox_worker: Arc<OutboxWorker>,
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let content_repo = Arc::new(MongoContentRepository::new(&db));

        let progress_repo = Arc::new(MongoProgressRepository::new(&db));
        progress_repo.ensure_indexes().await?;

        let streak_repo = Arc::new(MongoStreakRepository::new(&db));
        streak_repo.ensure_indexes().await?;

        let outbox_repo = Arc::new(MongoOutboxRepository::new(&db));
        outbox_repo.ensure_indexes().await?;
        let outbox_repo: Arc<dyn OutboxRepository> = outbox_repo;

        let streak_service = Arc::new(StreakService::new(streak_repo));

        let dispatcher = Arc::new(EffectDispatcher::new(
            Arc::new(MongoNotifier::new(&db)),
            streak_service.clone(),
            Arc::new(WebhookGrader::new(config.grader_webhook_url.clone())),
        ));

        let outbox_worker = Arc::new(OutboxWorker::new(
            outbox_repo.clone(),
            dispatcher,
            Duration::from_secs(config.outbox_poll_seconds),
        ));

        let effect_queue = Arc::new(OutboxQueue::new(outbox_repo, config.outbox_max_attempts));

        let progress_service = Arc::new(ProgressService::new(
            content_repo,
            progress_repo,
            effect_queue,
        ));

        Ok(Self {
            progress_service,
            streak_service,
            outbox_worker,
            db,
            config: Arc::new(config),
        })
    }
}
