use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One submitted answer. Rows are appended during submission and never
/// updated or deleted by the core.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnswerSheetEntry {
    pub id: i64,
    pub student_id: i64,
    pub exam_id: i64,
    pub question_id: i32,
    pub submitted_text: String,
    pub created_at: DateTime<Utc>,
}
