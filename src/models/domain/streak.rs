use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Per-user study streak counter, credited when a lesson freshly completes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct StudyStreak {
    pub user_id: String,
    pub current_streak: i32,
    pub longest_streak: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_credit_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl StudyStreak {
    pub fn new(user_id: &str) -> Self {
        StudyStreak {
            user_id: user_id.to_string(),
            current_streak: 0,
            longest_streak: 0,
            last_credit_date: None,
            modified_at: Some(Utc::now()),
        }
    }

    /// Apply one completion credit for `today`. A second credit on the same
    /// day is a no-op; a credit the day after the last one extends the
    /// streak; anything later restarts it at 1. Returns whether the counter
    /// changed.
    pub fn credit(&mut self, today: NaiveDate) -> bool {
        match self.last_credit_date {
            Some(last) if last == today => false,
            Some(last) if last.succ_opt() == Some(today) => {
                self.current_streak += 1;
                self.longest_streak = self.longest_streak.max(self.current_streak);
                self.last_credit_date = Some(today);
                self.modified_at = Some(Utc::now());
                true
            }
            _ => {
                self.current_streak = 1;
                self.longest_streak = self.longest_streak.max(1);
                self.last_credit_date = Some(today);
                self.modified_at = Some(Utc::now());
                true
            }
        }
    }
}
