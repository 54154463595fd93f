use async_graphql::Enum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Instructor,
    Admin,
}

/// The authenticated caller, resolved once per request by the auth layer and
/// passed explicitly into every service method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub role: UserRole,
}

impl Principal {
    pub fn new(id: &str, role: UserRole) -> Self {
        Self {
            id: id.to_string(),
            role,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self.role, UserRole::Instructor | UserRole::Admin)
    }
}
