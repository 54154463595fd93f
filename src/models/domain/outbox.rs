use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A side effect of a progress mutation, recorded durably and delivered by
/// the outbox worker instead of blocking the request that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SideEffect {
    StreakCredit {
        user_id: String,
    },
    StudentNotification {
        user_id: String,
        title: String,
        body: String,
    },
    ProjectGrade {
        user_id: String,
        lesson_id: String,
        repo_link: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutboxStatus {
    Pending,
    Delivered,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutboxEntry {
    pub id: String,
    pub effect: SideEffect,
    pub status: OutboxStatus,
    pub attempts: i32,
    pub max_attempts: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
}

impl OutboxEntry {
    pub fn new(effect: SideEffect, max_attempts: i32) -> Self {
        OutboxEntry {
            id: Uuid::new_v4().to_string(),
            effect,
            status: OutboxStatus::Pending,
            attempts: 0,
            max_attempts,
            last_error: None,
            created_at: Utc::now(),
            delivered_at: None,
        }
    }
}
