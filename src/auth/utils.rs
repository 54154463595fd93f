use async_graphql::Context;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::{Principal, UserRole},
};

/// Project review is an instructor action; admins manage content, they do not
/// grade, and students obviously cannot.
pub fn require_instructor(principal: &Principal) -> AppResult<()> {
    if principal.role != UserRole::Instructor {
        return Err(AppError::Unauthorized(
            "Only instructors can review projects".to_string(),
        ));
    }
    Ok(())
}

/// Whether `principal` may see the submission owned by `owner_id`: the owner
/// themselves, or staff (instructor/admin).
pub fn can_view_submission(principal: &Principal, owner_id: &str) -> bool {
    principal.id == owner_id || principal.is_staff()
}

pub fn extract_claims_from_context(ctx: &Context<'_>) -> AppResult<Claims> {
    ctx.data::<Claims>()
        .cloned()
        .map_err(|_| AppError::Unauthorized("Authentication required".to_string()))
}

/// Like [`extract_claims_from_context`] but for queries where an anonymous
/// caller is allowed and simply sees everything locked.
pub fn maybe_claims_from_context(ctx: &Context<'_>) -> Option<Claims> {
    ctx.data::<Claims>().ok().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_instructor_success() {
        let principal = Principal::new("instructor-1", UserRole::Instructor);
        assert!(require_instructor(&principal).is_ok());
    }

    #[test]
    fn test_require_instructor_rejects_admin() {
        let principal = Principal::new("admin-1", UserRole::Admin);
        assert!(require_instructor(&principal).is_err());
    }

    #[test]
    fn test_require_instructor_rejects_student() {
        let principal = Principal::new("student-1", UserRole::Student);
        assert!(require_instructor(&principal).is_err());
    }

    #[test]
    fn test_can_view_submission_as_owner() {
        let principal = Principal::new("student-1", UserRole::Student);
        assert!(can_view_submission(&principal, "student-1"));
    }

    #[test]
    fn test_can_view_submission_as_staff() {
        let instructor = Principal::new("instructor-1", UserRole::Instructor);
        let admin = Principal::new("admin-1", UserRole::Admin);
        assert!(can_view_submission(&instructor, "someone-else"));
        assert!(can_view_submission(&admin, "someone-else"));
    }

    #[test]
    fn test_can_view_submission_denies_other_student() {
        let principal = Principal::new("student-1", UserRole::Student);
        assert!(!can_view_submission(&principal, "student-2"));
    }
}
