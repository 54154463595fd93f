use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{LessonProgress, QuestionSnapshot, QuizSubmission, StudyStreak};

/// Result of one quiz submission. `success: false` carries a business-rule
/// refusal (attempt cap) rather than an error, so the client can render the
/// message without special-casing exceptions.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizResult {
    pub success: bool,
    pub score: i32,
    pub passed: bool,
    /// Answer key, disclosed only after the attempt is recorded so the client
    /// can render a review.
    pub correct_answers: Vec<i32>,
    pub message: String,
}

impl QuizResult {
    pub fn rejected(message: &str) -> Self {
        QuizResult {
            success: false,
            score: 0,
            passed: false,
            correct_answers: vec![],
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize, SimpleObject)]
pub struct SubmissionAck {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct ReviewQuestionDto {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: i32,
}

impl From<QuestionSnapshot> for ReviewQuestionDto {
    fn from(snapshot: QuestionSnapshot) -> Self {
        ReviewQuestionDto {
            prompt: snapshot.prompt,
            options: snapshot.options,
            correct_answer: snapshot.correct_answer,
        }
    }
}

/// A past attempt paired with the questions as they stood when it was taken.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizReview {
    pub questions: Vec<ReviewQuestionDto>,
    pub user_answers: Vec<i32>,
    pub score: i32,
    pub passed: bool,
}

/// One row of the course outline: the lesson plus the caller's lock and
/// completion state.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct LessonStatus {
    pub lesson_id: String,
    pub title: String,
    pub order_index: i32,
    pub has_project: bool,
    pub locked: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct ProgressDto {
    pub lesson_id: String,
    pub is_completed: bool,
    pub quiz_attempts: i32,
    pub highest_quiz_score: i32,
    pub project_repo_link: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub project_reviewed: bool,
    pub project_rating: Option<i32>,
    pub project_feedback: Option<String>,
}

impl From<LessonProgress> for ProgressDto {
    fn from(progress: LessonProgress) -> Self {
        ProgressDto {
            lesson_id: progress.lesson_id,
            is_completed: progress.is_completed,
            quiz_attempts: progress.quiz_attempts,
            highest_quiz_score: progress.highest_quiz_score,
            project_repo_link: progress.project_repo_link,
            completed_at: progress.completed_at,
            project_reviewed: progress.project_reviewed,
            project_rating: progress.project_rating,
            project_feedback: progress.project_feedback,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct AttemptDto {
    pub id: String,
    pub score: i32,
    pub passed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<QuizSubmission> for AttemptDto {
    fn from(submission: QuizSubmission) -> Self {
        AttemptDto {
            id: submission.id,
            score: submission.score,
            passed: submission.passed,
            created_at: submission.created_at,
        }
    }
}

/// Instructor dashboard row: a submitted project awaiting review.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct PendingReviewDto {
    pub user_id: String,
    pub lesson_id: String,
    pub repo_link: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl From<LessonProgress> for PendingReviewDto {
    fn from(progress: LessonProgress) -> Self {
        PendingReviewDto {
            user_id: progress.user_id,
            lesson_id: progress.lesson_id,
            repo_link: progress.project_repo_link.unwrap_or_default(),
            submitted_at: progress.modified_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct StreakDto {
    pub current_streak: i32,
    pub longest_streak: i32,
}

impl From<StudyStreak> for StreakDto {
    fn from(streak: StudyStreak) -> Self {
        StreakDto {
            current_streak: streak.current_streak,
            longest_streak: streak.longest_streak,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_result_shape() {
        let result = QuizResult::rejected("Max attempts reached");
        assert!(!result.success);
        assert_eq!(result.score, 0);
        assert!(!result.passed);
        assert!(result.correct_answers.is_empty());
        assert_eq!(result.message, "Max attempts reached");
    }

    #[test]
    fn test_progress_dto_carries_review_overlay() {
        let mut progress = LessonProgress::new("user-1", "lesson-1");
        progress.project_reviewed = true;
        progress.project_rating = Some(85);

        let dto: ProgressDto = progress.into();
        assert!(dto.project_reviewed);
        assert_eq!(dto.project_rating, Some(85));
    }
}
