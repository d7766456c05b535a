use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Exam header row. Created by the admin workflow; the submission core
/// only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exam {
    pub id: i64,
    pub subject: String,
    pub open_at: DateTime<Utc>,
    pub close_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub question_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Exam {
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.open_at <= now && now <= self.close_at
    }
}
