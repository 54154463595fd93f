use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::Question;

/// Snapshot of one question as it stood at submission time. Stored with the
/// submission so a later edit to the lesson's questions cannot misalign the
/// answer array when the attempt is reviewed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionSnapshot {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: i32,
}

impl From<&Question> for QuestionSnapshot {
    fn from(question: &Question) -> Self {
        QuestionSnapshot {
            prompt: question.prompt.clone(),
            options: question.options.clone(),
            correct_answer: question.correct_answer,
        }
    }
}

/// One quiz attempt. Append-only: never mutated or deleted once written.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizSubmission {
    pub id: String,
    pub user_id: String,
    pub lesson_id: String,
    pub answers: Vec<i32>,
    pub score: i32,
    pub passed: bool,
    /// Empty for rows written before snapshots existed; review falls back to
    /// the lesson's current question set for those.
    #[serde(default)]
    pub questions: Vec<QuestionSnapshot>,
    pub created_at: DateTime<Utc>,
}

impl QuizSubmission {
    pub fn new(
        user_id: &str,
        lesson_id: &str,
        answers: Vec<i32>,
        score: i32,
        passed: bool,
        questions: Vec<QuestionSnapshot>,
    ) -> Self {
        QuizSubmission {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            lesson_id: lesson_id.to_string(),
            answers,
            score,
            passed,
            questions,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_round_trip_preserves_snapshot() {
        let question = Question::new(
            "q-1",
            "l-1",
            "Pick one",
            vec!["a".to_string(), "b".to_string()],
            1,
            0,
        );
        let submission = QuizSubmission::new(
            "user-1",
            "l-1",
            vec![1],
            100,
            true,
            vec![QuestionSnapshot::from(&question)],
        );

        let json = serde_json::to_string(&submission).expect("submission should serialize");
        let parsed: QuizSubmission =
            serde_json::from_str(&json).expect("submission should deserialize");

        assert_eq!(parsed.score, 100);
        assert!(parsed.passed);
        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(parsed.questions[0].correct_answer, 1);
    }

    #[test]
    fn test_submission_without_snapshot_deserializes() {
        // Rows written before the snapshot field existed.
        let json = r#"{
            "id": "s-1",
            "user_id": "user-1",
            "lesson_id": "l-1",
            "answers": [0, 2],
            "score": 50,
            "passed": false,
            "created_at": "2026-01-15T10:00:00Z"
        }"#;

        let parsed: QuizSubmission = serde_json::from_str(json).expect("legacy row should parse");
        assert!(parsed.questions.is_empty());
        assert_eq!(parsed.answers, vec![0, 2]);
    }
}
