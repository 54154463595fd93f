pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod utils;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::MaybeAuthenticated;
pub use utils::{
    can_view_submission, extract_claims_from_context, maybe_claims_from_context,
    require_instructor,
};
