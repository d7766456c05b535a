use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::answer_sheet::AnswerSheetEntry;
use crate::models::exam_result::ExamResult;
use crate::models::question_stat::QuestionStat;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionStatResponse {
    pub question_id: i32,
    pub exam_id: i64,
    pub attempt_count: i64,
    pub correct_count: i64,
    pub correct_rate: f64,
}

impl From<QuestionStat> for QuestionStatResponse {
    fn from(stat: QuestionStat) -> Self {
        Self {
            question_id: stat.question_id,
            exam_id: stat.exam_id,
            attempt_count: stat.attempt_count,
            correct_count: stat.correct_count,
            correct_rate: stat.correct_rate.to_string().parse::<f64>().unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnswerSheetResponse {
    pub question_id: i32,
    pub submitted_text: String,
    pub created_at: DateTime<Utc>,
}

impl From<AnswerSheetEntry> for AnswerSheetResponse {
    fn from(entry: AnswerSheetEntry) -> Self {
        Self {
            question_id: entry.question_id,
            submitted_text: entry.submitted_text,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExamResultResponse {
    pub student_id: i64,
    pub exam_id: i64,
    pub score: i32,
    pub completed_at: DateTime<Utc>,
}

impl From<ExamResult> for ExamResultResponse {
    fn from(result: ExamResult) -> Self {
        Self {
            student_id: result.student_id,
            exam_id: result.exam_id,
            score: result.score,
            completed_at: result.completed_at,
        }
    }
}
