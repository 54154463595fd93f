use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{
    db::{Database, LESSONS_COLLECTION, QUESTIONS_COLLECTION},
    errors::AppResult,
    models::domain::{Lesson, Question},
};

/// Read-only view of course content. Lessons and questions are authored by a
/// separate admin surface; this service only consumes them.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn get_lesson(&self, lesson_id: &str) -> AppResult<Option<Lesson>>;

    /// Lessons of a course in presentation order.
    async fn get_course_lessons(&self, course_id: &str) -> AppResult<Vec<Lesson>>;

    /// Questions of a lesson in quiz order.
    async fn get_lesson_questions(&self, lesson_id: &str) -> AppResult<Vec<Question>>;
}

pub struct MongoContentRepository {
    lessons: Collection<Lesson>,
    questions: Collection<Question>,
}

impl MongoContentRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            lessons: db.get_collection(LESSONS_COLLECTION),
            questions: db.get_collection(QUESTIONS_COLLECTION),
        }
    }
}

#[async_trait]
impl ContentRepository for MongoContentRepository {
    async fn get_lesson(&self, lesson_id: &str) -> AppResult<Option<Lesson>> {
        let lesson = self.lessons.find_one(doc! { "id": lesson_id }).await?;
        Ok(lesson)
    }

    async fn get_course_lessons(&self, course_id: &str) -> AppResult<Vec<Lesson>> {
        let lessons = self
            .lessons
            .find(doc! { "course_id": course_id })
            .sort(doc! { "order_index": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(lessons)
    }

    async fn get_lesson_questions(&self, lesson_id: &str) -> AppResult<Vec<Question>> {
        let questions = self
            .questions
            .find(doc! { "lesson_id": lesson_id })
            .sort(doc! { "order_index": 1, "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(questions)
    }
}
