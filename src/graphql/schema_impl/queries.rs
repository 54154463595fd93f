use async_graphql::{Context, Object};

use crate::{
    app_state::AppState,
    auth::{extract_claims_from_context, maybe_claims_from_context},
    errors::AppResult,
    models::dto::response::{
        AttemptDto, LessonStatus, PendingReviewDto, ProgressDto, QuizReview, StreakDto,
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Lock state of one lesson for the caller. Anonymous callers always see
    /// a locked lesson.
    async fn lesson_locked(
        &self,
        ctx: &Context<'_>,
        course_id: String,
        lesson_id: String,
    ) -> AppResult<bool> {
        let state = ctx.data::<AppState>()?;
        let principal = maybe_claims_from_context(ctx).map(|c| c.principal());

        state
            .progress_service
            .is_lesson_locked(principal.as_ref(), &course_id, &lesson_id)
            .await
    }

    /// Every lesson of a course with the caller's lock and completion state.
    async fn course_outline(
        &self,
        ctx: &Context<'_>,
        course_id: String,
    ) -> AppResult<Vec<LessonStatus>> {
        let state = ctx.data::<AppState>()?;
        let principal = maybe_claims_from_context(ctx).map(|c| c.principal());

        state
            .progress_service
            .course_outline(principal.as_ref(), &course_id)
            .await
    }

    async fn my_progress(
        &self,
        ctx: &Context<'_>,
        course_id: String,
    ) -> AppResult<Vec<ProgressDto>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let records = state
            .progress_service
            .my_progress(&claims.principal(), &course_id)
            .await?;

        Ok(records.into_iter().map(ProgressDto::from).collect())
    }

    async fn my_attempts(
        &self,
        ctx: &Context<'_>,
        lesson_id: String,
    ) -> AppResult<Vec<AttemptDto>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let submissions = state
            .progress_service
            .my_attempts(&claims.principal(), &lesson_id)
            .await?;

        Ok(submissions.into_iter().map(AttemptDto::from).collect())
    }

    /// A past attempt with its answer key. Null when the submission does not
    /// exist or the caller may not see it.
    async fn quiz_review(
        &self,
        ctx: &Context<'_>,
        submission_id: String,
    ) -> AppResult<Option<QuizReview>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state
            .progress_service
            .quiz_review(&claims.principal(), &submission_id)
            .await
    }

    async fn my_streak(&self, ctx: &Context<'_>) -> AppResult<StreakDto> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let streak = state.streak_service.current(&claims.sub).await?;
        Ok(StreakDto::from(streak))
    }

    /// Submitted projects awaiting review. Instructor only.
    async fn pending_reviews(&self, ctx: &Context<'_>) -> AppResult<Vec<PendingReviewDto>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let records = state
            .progress_service
            .pending_reviews(&claims.principal())
            .await?;

        Ok(records.into_iter().map(PendingReviewDto::from).collect())
    }
}
