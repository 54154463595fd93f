use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An ordered unit of course content. Read-only to this service; authored
/// elsewhere and consumed through the content repository.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Lesson {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub order_index: i32,
    pub has_project: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Lesson {
    pub fn new(id: &str, course_id: &str, title: &str, order_index: i32, has_project: bool) -> Self {
        Lesson {
            id: id.to_string(),
            course_id: course_id.to_string(),
            title: title.to_string(),
            order_index,
            has_project,
            created_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_round_trip_serialization() {
        let lesson = Lesson::new("l-1", "c-1", "Intro to Git", 0, true);

        let json = serde_json::to_string(&lesson).expect("lesson should serialize");
        let parsed: Lesson = serde_json::from_str(&json).expect("lesson should deserialize");

        assert_eq!(parsed.id, "l-1");
        assert_eq!(parsed.order_index, 0);
        assert!(parsed.has_project);
    }
}
