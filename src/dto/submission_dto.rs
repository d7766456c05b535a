use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// One complete attempt: every answered question in a single request.
/// Map keys are question identifiers, values the raw submitted text
/// (a label character for choice questions, "O"/"X" for true/false).
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitExamRequest {
    #[validate(range(min = 1))]
    pub student_id: i64,
    pub answers: BTreeMap<i32, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitExamResponse {
    pub exam_id: i64,
    pub student_id: i64,
    pub score: i32,
    pub graded_questions: i32,
    pub skipped_questions: i32,
    pub completed_at: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicExamSummary {
    pub id: i64,
    pub subject: String,
    pub open_at: DateTime<Utc>,
    pub close_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub question_count: i32,
    pub is_open: bool,
}
