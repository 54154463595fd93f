use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single-choice quiz question. `correct_answer` is an index into `options`,
/// and submitted answers are compared against it positionally.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub lesson_id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: i32,
    pub order_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Question {
    pub fn new(
        id: &str,
        lesson_id: &str,
        prompt: &str,
        options: Vec<String>,
        correct_answer: i32,
        order_index: i32,
    ) -> Self {
        Question {
            id: id.to_string(),
            lesson_id: lesson_id.to_string(),
            prompt: prompt.to_string(),
            options,
            correct_answer,
            order_index,
            created_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_round_trip_serialization() {
        let question = Question::new(
            "q-1",
            "l-1",
            "What does `git init` do?",
            vec![
                "Creates a repository".to_string(),
                "Deletes a repository".to_string(),
            ],
            0,
            1,
        );

        let json = serde_json::to_string(&question).expect("question should serialize");
        let parsed: Question = serde_json::from_str(&json).expect("question should deserialize");

        assert_eq!(parsed.correct_answer, 0);
        assert_eq!(parsed.options.len(), 2);
    }
}
