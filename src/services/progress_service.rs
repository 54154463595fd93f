use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::{
    auth::{can_view_submission, require_instructor},
    errors::{AppError, AppResult},
    models::{
        domain::{
            Lesson, LessonProgress, Principal, ProgressPatch, QuestionSnapshot, QuizSubmission,
            ReviewOverlay, SideEffect, UserRole,
        },
        dto::response::{LessonStatus, QuizResult, QuizReview},
    },
    repositories::{ContentRepository, ProgressRepository},
    services::{
        effects::EffectQueue,
        scoring::{score_answers, MAX_QUIZ_ATTEMPTS, PASS_THRESHOLD},
    },
};

/// Whether `lesson_id` is locked for a caller with `role`, given the course's
/// ordered lesson list and the set of lessons the caller has completed.
///
/// Admins are never locked out, the first lesson is always open, and every
/// other lesson requires the immediately preceding one to be completed. A
/// lesson missing from the list fails closed.
pub fn lesson_is_locked(
    role: UserRole,
    lessons: &[Lesson],
    lesson_id: &str,
    completed: &HashSet<String>,
) -> bool {
    if role == UserRole::Admin {
        return false;
    }

    match lessons.iter().position(|l| l.id == lesson_id) {
        Some(0) => false,
        Some(i) => !completed.contains(&lessons[i - 1].id),
        None => true,
    }
}

/// Owns the lesson completion state machine: lock evaluation, quiz scoring,
/// project submission, instructor review, and the reconciliation of all of
/// those into a single `is_completed` flag.
///
/// Completion is always recomputed here at every mutation point; no caller
/// can set it directly.
pub struct ProgressService {
    content: Arc<dyn ContentRepository>,
    progress: Arc<dyn ProgressRepository>,
    effects: Arc<dyn EffectQueue>,
}

impl ProgressService {
    pub fn new(
        content: Arc<dyn ContentRepository>,
        progress: Arc<dyn ProgressRepository>,
        effects: Arc<dyn EffectQueue>,
    ) -> Self {
        Self {
            content,
            progress,
            effects,
        }
    }

    /// Lock state of a single lesson for the caller. Anonymous callers see
    /// every lesson locked.
    pub async fn is_lesson_locked(
        &self,
        principal: Option<&Principal>,
        course_id: &str,
        lesson_id: &str,
    ) -> AppResult<bool> {
        let Some(principal) = principal else {
            return Ok(true);
        };

        let lessons = self.content.get_course_lessons(course_id).await?;
        let completed = self.completed_lessons(&principal.id, &lessons).await?;

        Ok(lesson_is_locked(
            principal.role,
            &lessons,
            lesson_id,
            &completed,
        ))
    }

    /// The whole course as the caller sees it: each lesson with its lock and
    /// completion state, in presentation order.
    pub async fn course_outline(
        &self,
        principal: Option<&Principal>,
        course_id: &str,
    ) -> AppResult<Vec<LessonStatus>> {
        let lessons = self.content.get_course_lessons(course_id).await?;

        let completed = match principal {
            Some(p) => self.completed_lessons(&p.id, &lessons).await?,
            None => HashSet::new(),
        };

        let outline = lessons
            .iter()
            .map(|lesson| LessonStatus {
                lesson_id: lesson.id.clone(),
                title: lesson.title.clone(),
                order_index: lesson.order_index,
                has_project: lesson.has_project,
                locked: match principal {
                    Some(p) => lesson_is_locked(p.role, &lessons, &lesson.id, &completed),
                    None => true,
                },
                completed: completed.contains(&lesson.id),
            })
            .collect();

        Ok(outline)
    }

    /// Score a quiz attempt and fold the result into the caller's progress.
    ///
    /// The attempt cap and the zero-question auto-pass are business rules,
    /// not errors: both come back as a structured result. The submission log
    /// append and the streak credit are best-effort; only the progress
    /// upsert itself can fail the call.
    pub async fn submit_quiz(
        &self,
        principal: &Principal,
        lesson_id: &str,
        answers: &[i32],
    ) -> AppResult<QuizResult> {
        let lesson = self
            .content
            .get_lesson(lesson_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lesson '{}' not found", lesson_id)))?;

        let existing = self.progress.get_progress(&principal.id, lesson_id).await?;

        let attempts_so_far = existing.as_ref().map_or(0, |p| p.quiz_attempts);
        if attempts_so_far >= MAX_QUIZ_ATTEMPTS {
            return Ok(QuizResult::rejected("Max attempts reached"));
        }

        let questions = self.content.get_lesson_questions(lesson_id).await?;

        // A lesson without questions auto-passes at score 0. Longstanding
        // behavior that course authors rely on for project-only lessons.
        let (score, passed) = if questions.is_empty() {
            (0, true)
        } else {
            let (score, _) = score_answers(&questions, answers);
            (score, score >= PASS_THRESHOLD)
        };

        let has_project_link = existing
            .as_ref()
            .is_some_and(|p| p.project_repo_link.is_some());
        let now_completed = passed && (!lesson.has_project || has_project_link);
        let was_completed = existing.as_ref().is_some_and(|p| p.is_completed);

        let highest = existing
            .as_ref()
            .map_or(score, |p| p.highest_quiz_score.max(score));

        let record = ProgressPatch {
            quiz_attempts: Some(attempts_so_far + 1),
            highest_quiz_score: Some(highest),
            is_completed: Some(now_completed),
            ..Default::default()
        }
        .apply(existing.as_ref(), &principal.id, lesson_id, Utc::now());

        self.progress.upsert_progress(record).await?;

        let submission = QuizSubmission::new(
            &principal.id,
            lesson_id,
            answers.to_vec(),
            score,
            passed,
            questions.iter().map(QuestionSnapshot::from).collect(),
        );
        if let Err(e) = self.progress.insert_submission(submission).await {
            log::warn!(
                "Failed to record quiz submission for user {} lesson {}: {}",
                principal.id,
                lesson_id,
                e
            );
        }

        if !was_completed && now_completed {
            self.credit_streak(&principal.id).await;
        }

        Ok(QuizResult {
            success: true,
            score,
            passed,
            correct_answers: questions.iter().map(|q| q.correct_answer).collect(),
            message: if passed {
                "Quiz passed".to_string()
            } else {
                "Quiz submitted".to_string()
            },
        })
    }

    /// Record a project submission and reconcile completion. A reviewed
    /// project is frozen; resubmission is only possible while unreviewed and
    /// always clears any prior review overlay.
    pub async fn submit_project(
        &self,
        principal: &Principal,
        lesson_id: &str,
        repo_link: &str,
    ) -> AppResult<()> {
        self.content
            .get_lesson(lesson_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lesson '{}' not found", lesson_id)))?;

        let existing = self.progress.get_progress(&principal.id, lesson_id).await?;

        if existing.as_ref().is_some_and(|p| p.project_reviewed) {
            return Err(AppError::BadRequest(
                "Project has been reviewed and cannot be updated".to_string(),
            ));
        }

        let questions = self.content.get_lesson_questions(lesson_id).await?;
        let highest = existing.as_ref().map_or(0, |p| p.highest_quiz_score);
        let now_completed = questions.is_empty() || highest >= PASS_THRESHOLD;
        let was_completed = existing.as_ref().is_some_and(|p| p.is_completed);

        let record = ProgressPatch {
            project_repo_link: Some(repo_link.to_string()),
            is_completed: Some(now_completed),
            reset_review: true,
            ..Default::default()
        }
        .apply(existing.as_ref(), &principal.id, lesson_id, Utc::now());

        self.progress.upsert_progress(record).await?;

        if !was_completed && now_completed {
            self.credit_streak(&principal.id).await;
        }

        self.enqueue_best_effort(SideEffect::ProjectGrade {
            user_id: principal.id.clone(),
            lesson_id: lesson_id.to_string(),
            repo_link: repo_link.to_string(),
        })
        .await;

        Ok(())
    }

    /// Attach an instructor's rating and feedback to a student's submitted
    /// project. Grading is informational; it never touches `is_completed`.
    pub async fn review_project(
        &self,
        principal: &Principal,
        lesson_id: &str,
        student_user_id: &str,
        rating: i32,
        feedback: Option<String>,
    ) -> AppResult<()> {
        require_instructor(principal)?;

        if !(0..=100).contains(&rating) {
            return Err(AppError::ValidationError(
                "Rating must be between 0 and 100".to_string(),
            ));
        }

        let existing = self
            .progress
            .get_progress(student_user_id, lesson_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No submission found for this student and lesson".to_string())
            })?;

        let record = ProgressPatch {
            review: Some(ReviewOverlay {
                rating,
                reviewed_by: principal.id.clone(),
                feedback: feedback.clone(),
            }),
            ..Default::default()
        }
        .apply(Some(&existing), student_user_id, lesson_id, Utc::now());

        self.progress.upsert_progress(record).await?;

        let body = match feedback {
            Some(feedback) => format!("Your project was rated {}/100: {}", rating, feedback),
            None => format!("Your project was rated {}/100", rating),
        };
        self.enqueue_best_effort(SideEffect::StudentNotification {
            user_id: student_user_id.to_string(),
            title: "Project reviewed".to_string(),
            body,
        })
        .await;

        Ok(())
    }

    /// A past attempt with its question set for side-by-side rendering.
    ///
    /// Returns `None` both when the submission does not exist and when the
    /// caller may not see it, so a probing client cannot distinguish the two.
    pub async fn quiz_review(
        &self,
        principal: &Principal,
        submission_id: &str,
    ) -> AppResult<Option<QuizReview>> {
        let Some(submission) = self.progress.find_submission(submission_id).await? else {
            return Ok(None);
        };

        if !can_view_submission(principal, &submission.user_id) {
            return Ok(None);
        }

        // Prefer the snapshot captured at submission time; rows from before
        // snapshots existed fall back to the lesson's current questions.
        let questions = if submission.questions.is_empty() {
            self.content
                .get_lesson_questions(&submission.lesson_id)
                .await?
                .iter()
                .map(QuestionSnapshot::from)
                .collect()
        } else {
            submission.questions
        };

        Ok(Some(QuizReview {
            questions: questions.into_iter().map(Into::into).collect(),
            user_answers: submission.answers,
            score: submission.score,
            passed: submission.passed,
        }))
    }

    /// The caller's progress rows for a course.
    pub async fn my_progress(
        &self,
        principal: &Principal,
        course_id: &str,
    ) -> AppResult<Vec<LessonProgress>> {
        let lessons = self.content.get_course_lessons(course_id).await?;
        let lesson_ids: Vec<String> = lessons.iter().map(|l| l.id.clone()).collect();
        self.progress
            .progress_for_lessons(&principal.id, &lesson_ids)
            .await
    }

    /// The caller's attempt history for one lesson, newest first.
    pub async fn my_attempts(
        &self,
        principal: &Principal,
        lesson_id: &str,
    ) -> AppResult<Vec<QuizSubmission>> {
        self.progress
            .submissions_for(&principal.id, lesson_id)
            .await
    }

    /// Submitted projects awaiting review, for the instructor dashboard.
    pub async fn pending_reviews(&self, principal: &Principal) -> AppResult<Vec<LessonProgress>> {
        require_instructor(principal)?;
        self.progress.pending_reviews().await
    }

    async fn completed_lessons(
        &self,
        user_id: &str,
        lessons: &[Lesson],
    ) -> AppResult<HashSet<String>> {
        let lesson_ids: Vec<String> = lessons.iter().map(|l| l.id.clone()).collect();
        let records = self
            .progress
            .progress_for_lessons(user_id, &lesson_ids)
            .await?;
        Ok(records
            .into_iter()
            .filter(|p| p.is_completed)
            .map(|p| p.lesson_id)
            .collect())
    }

    async fn credit_streak(&self, user_id: &str) {
        self.enqueue_best_effort(SideEffect::StreakCredit {
            user_id: user_id.to_string(),
        })
        .await;
    }

    async fn enqueue_best_effort(&self, effect: SideEffect) {
        if let Err(e) = self.effects.enqueue(effect).await {
            log::warn!("Failed to enqueue side effect: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::course_lessons;

    #[test]
    fn test_first_lesson_never_locked() {
        let completed = HashSet::new();
        assert!(!lesson_is_locked(
            UserRole::Student,
            &course_lessons("c-1"),
            "lesson-1",
            &completed
        ));
    }

    #[test]
    fn test_locked_until_predecessor_completed() {
        let lessons = course_lessons("c-1");
        let mut completed = HashSet::new();
        assert!(lesson_is_locked(
            UserRole::Student,
            &lessons,
            "lesson-2",
            &completed
        ));

        completed.insert("lesson-1".to_string());
        assert!(!lesson_is_locked(
            UserRole::Student,
            &lessons,
            "lesson-2",
            &completed
        ));
        assert!(lesson_is_locked(
            UserRole::Student,
            &lessons,
            "lesson-3",
            &completed
        ));
    }

    #[test]
    fn test_admin_never_locked() {
        let lessons = course_lessons("c-1");
        let completed = HashSet::new();
        for lesson_id in ["lesson-1", "lesson-2", "lesson-3", "unknown"] {
            assert!(!lesson_is_locked(
                UserRole::Admin,
                &lessons,
                lesson_id,
                &completed
            ));
        }
    }

    #[test]
    fn test_unknown_lesson_fails_closed() {
        let lessons = course_lessons("c-1");
        let completed: HashSet<String> =
            lessons.iter().map(|l| l.id.clone()).collect();

        assert!(lesson_is_locked(
            UserRole::Student,
            &lessons,
            "lesson-99",
            &completed
        ));
    }

    #[test]
    fn test_empty_lesson_list_fails_closed() {
        let completed = HashSet::new();
        assert!(lesson_is_locked(
            UserRole::Student,
            &[],
            "lesson-1",
            &completed
        ));
    }

    #[test]
    fn test_instructor_follows_same_lock_rules_as_student() {
        let completed = HashSet::new();
        assert!(lesson_is_locked(
            UserRole::Instructor,
            &course_lessons("c-1"),
            "lesson-2",
            &completed
        ));
    }
}
