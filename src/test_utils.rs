use crate::models::domain::{Lesson, Principal, Question, UserRole};
