pub mod content_repository;
pub mod outbox_repository;
pub mod progress_repository;
pub mod streak_repository;

pub use content_repository::{ContentRepository, MongoContentRepository};
pub use outbox_repository::{MongoOutboxRepository, OutboxRepository};
pub use progress_repository::{MongoProgressRepository, ProgressRepository};
pub use streak_repository::{MongoStreakRepository, StreakRepository};
