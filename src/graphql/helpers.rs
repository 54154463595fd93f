use validator::Validate;

use crate::errors::{AppError, AppResult};

/// Run derive-based validation on a GraphQL input, mapping the failure into
/// the app's error taxonomy.
pub fn validated<T: Validate>(input: T) -> AppResult<T> {
    input
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dto::request::SubmitProjectInput;

    #[test]
    fn test_validated_passes_good_input() {
        let input = SubmitProjectInput {
            lesson_id: "lesson-1".to_string(),
            repo_link: "https://github.com/user/repo".to_string(),
        };
        assert!(validated(input).is_ok());
    }

    #[test]
    fn test_validated_rejects_bad_input() {
        let input = SubmitProjectInput {
            lesson_id: "lesson-1".to_string(),
            repo_link: "nope".to_string(),
        };
        assert!(matches!(
            validated(input),
            Err(AppError::ValidationError(_))
        ));
    }
}
