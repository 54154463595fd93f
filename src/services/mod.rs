pub mod effects;
pub mod outbox_worker;
pub mod progress_service;
pub mod scoring;
pub mod streak_service;

pub use effects::{
    EffectDispatcher, EffectQueue, MongoNotifier, Notifier, OutboxQueue, ProjectGrader,
    StreakTracker, WebhookGrader,
};
pub use outbox_worker::OutboxWorker;
pub use progress_service::{lesson_is_locked, ProgressService};
pub use streak_service::StreakService;
