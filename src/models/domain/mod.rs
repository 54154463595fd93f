pub mod lesson;
pub mod lesson_progress;
pub mod notification;
pub mod outbox;
pub mod question;
pub mod quiz_submission;
pub mod streak;
pub mod user;

pub use lesson::Lesson;
pub use lesson_progress::{LessonProgress, ProgressPatch, ReviewOverlay};
pub use notification::Notification;
pub use outbox::{OutboxEntry, OutboxStatus, SideEffect};
pub use question::Question;
pub use quiz_submission::{QuestionSnapshot, QuizSubmission};
pub use streak::StudyStreak;
pub use user::{Principal, UserRole};
