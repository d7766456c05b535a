use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExamResult {
    pub student_id: i64,
    pub exam_id: i64,
    pub score: i32,
    pub completed_at: DateTime<Utc>,
}
