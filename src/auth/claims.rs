use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{Principal, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    pub role: UserRole,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at (as UTC timestamp)
}

impl Claims {
    pub fn new(user_id: &str, role: UserRole, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        }
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.sub.clone(),
            role: self.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("user-1", UserRole::Student, 24);

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, UserRole::Student);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_principal_from_claims() {
        let claims = Claims::new("instructor-1", UserRole::Instructor, 1);
        let principal = claims.principal();

        assert_eq!(principal.id, "instructor-1");
        assert_eq!(principal.role, UserRole::Instructor);
    }
}
