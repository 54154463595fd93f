use async_graphql::InputObject;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct SubmitQuizInput {
    #[validate(length(min = 1, max = 64))]
    pub lesson_id: String,

    /// One selected option index per question, aligned to question order.
    #[validate(length(max = 200))]
    pub answers: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct SubmitProjectInput {
    #[validate(length(min = 1, max = 64))]
    pub lesson_id: String,

    #[validate(url(message = "Repo link must be a valid URL"))]
    pub repo_link: String,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct ReviewProjectInput {
    #[validate(length(min = 1, max = 64))]
    pub lesson_id: String,

    #[validate(length(min = 1, max = 64))]
    pub student_user_id: String,

    #[validate(range(min = 0, max = 100, message = "Rating must be between 0 and 100"))]
    pub rating: i32,

    #[validate(length(max = 5000))]
    pub feedback: Option<String>,
}
