use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-user, per-lesson progress state. One document per (user_id, lesson_id),
/// written only through [`ProgressPatch::apply`] so the set-once `completed_at`
/// rule and the review-overlay reset stay in one place.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LessonProgress {
    pub id: String,
    pub user_id: String,
    pub lesson_id: String,
    pub is_completed: bool,
    pub quiz_attempts: i32,
    pub highest_quiz_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_repo_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub project_reviewed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl LessonProgress {
    pub fn new(user_id: &str, lesson_id: &str) -> Self {
        LessonProgress {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            lesson_id: lesson_id.to_string(),
            is_completed: false,
            quiz_attempts: 0,
            highest_quiz_score: 0,
            project_repo_link: None,
            completed_at: None,
            project_reviewed: false,
            project_rating: None,
            reviewed_by: None,
            reviewed_at: None,
            project_feedback: None,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }
}

/// Instructor review fields layered on a project submission. Independent of
/// the completion state; resubmitting a project clears it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewOverlay {
    pub rating: i32,
    pub reviewed_by: String,
    pub feedback: Option<String>,
}

/// Partial update applied against the previously-read progress record.
/// Absent fields keep their existing values; the reset of the review overlay
/// is an explicit flag rather than an implicit field omission.
#[derive(Clone, Debug, Default)]
pub struct ProgressPatch {
    pub quiz_attempts: Option<i32>,
    pub highest_quiz_score: Option<i32>,
    pub project_repo_link: Option<String>,
    pub is_completed: Option<bool>,
    pub reset_review: bool,
    pub review: Option<ReviewOverlay>,
}

impl ProgressPatch {
    /// Merge this patch into `existing` (or a fresh record when none exists
    /// yet), producing the document to upsert.
    ///
    /// `completed_at` is set exactly once, on the first false-to-true
    /// completion transition, and preserved on every later write.
    pub fn apply(
        self,
        existing: Option<&LessonProgress>,
        user_id: &str,
        lesson_id: &str,
        now: DateTime<Utc>,
    ) -> LessonProgress {
        let mut record = existing
            .cloned()
            .unwrap_or_else(|| LessonProgress::new(user_id, lesson_id));

        if let Some(attempts) = self.quiz_attempts {
            record.quiz_attempts = attempts;
        }
        if let Some(score) = self.highest_quiz_score {
            record.highest_quiz_score = score;
        }
        if let Some(link) = self.project_repo_link {
            record.project_repo_link = Some(link);
        }
        if let Some(completed) = self.is_completed {
            if completed && !record.is_completed && record.completed_at.is_none() {
                record.completed_at = Some(now);
            }
            record.is_completed = completed;
        }

        if self.reset_review {
            record.project_reviewed = false;
            record.project_rating = None;
            record.reviewed_by = None;
            record.reviewed_at = None;
            record.project_feedback = None;
        }

        if let Some(review) = self.review {
            record.project_reviewed = true;
            record.project_rating = Some(review.rating);
            record.reviewed_by = Some(review.reviewed_by);
            record.reviewed_at = Some(now);
            record.project_feedback = review.feedback;
        }

        record.modified_at = Some(now);
        record
    }
}
