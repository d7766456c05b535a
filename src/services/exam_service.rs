use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::models::exam::Exam;

#[derive(Clone)]
pub struct ExamService {
    pool: PgPool,
}

impl ExamService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_exam(&self, exam_id: i64) -> Result<Exam> {
        let exam = sqlx::query_as::<_, Exam>(
            r#"
            SELECT id, subject, open_at, close_at, duration_minutes, question_count, created_at
            FROM exams
            WHERE id = $1
            "#,
        )
        .bind(exam_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Exam {} not found", exam_id)))?;
        Ok(exam)
    }
}
