use async_graphql::{Context, Object};

use crate::{
    app_state::AppState,
    auth::extract_claims_from_context,
    errors::AppResult,
    graphql::helpers::validated,
    models::dto::{
        request::{ReviewProjectInput, SubmitProjectInput, SubmitQuizInput},
        response::{QuizResult, SubmissionAck},
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Submit one quiz attempt. A capped-out attempt comes back as
    /// `success: false` with a message, not as an error.
    async fn submit_quiz(
        &self,
        ctx: &Context<'_>,
        input: SubmitQuizInput,
    ) -> AppResult<QuizResult> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;
        let input = validated(input)?;

        state
            .progress_service
            .submit_quiz(&claims.principal(), &input.lesson_id, &input.answers)
            .await
    }

    async fn submit_project(
        &self,
        ctx: &Context<'_>,
        input: SubmitProjectInput,
    ) -> AppResult<SubmissionAck> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;
        let input = validated(input)?;

        state
            .progress_service
            .submit_project(&claims.principal(), &input.lesson_id, &input.repo_link)
            .await?;

        Ok(SubmissionAck {
            message: "Project submitted".to_string(),
        })
    }

    /// Attach a rating and feedback to a student's project. Instructor only.
    async fn review_project(
        &self,
        ctx: &Context<'_>,
        input: ReviewProjectInput,
    ) -> AppResult<SubmissionAck> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;
        let input = validated(input)?;

        state
            .progress_service
            .review_project(
                &claims.principal(),
                &input.lesson_id,
                &input.student_user_id,
                input.rating,
                input.feedback,
            )
            .await?;

        Ok(SubmissionAck {
            message: "Review recorded".to_string(),
        })
    }
}
