use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{Error, Result};
use crate::models::exam_result::ExamResult;

#[derive(Clone)]
pub struct ExamResultService {
    pool: PgPool,
}

impl ExamResultService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Advisory pre-check. Two near-simultaneous submissions can both pass
    /// it; the primary key on exam_results is what actually decides.
    pub async fn exists(
        tx: &mut Transaction<'_, Postgres>,
        student_id: i64,
        exam_id: i64,
    ) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM exam_results WHERE student_id = $1 AND exam_id = $2)"#,
        )
        .bind(student_id)
        .bind(exam_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(exists)
    }

    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        student_id: i64,
        exam_id: i64,
        score: i32,
        completed_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO exam_results (student_id, exam_id, score, completed_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(student_id)
        .bind(exam_id)
        .bind(score)
        .bind(completed_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => Error::DuplicateAttempt,
            other => other.into(),
        })?;
        Ok(())
    }

    pub async fn list_for_exam(&self, exam_id: i64) -> Result<Vec<ExamResult>> {
        let results = sqlx::query_as::<_, ExamResult>(
            r#"
            SELECT student_id, exam_id, score, completed_at
            FROM exam_results
            WHERE exam_id = $1
            ORDER BY student_id
            "#,
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(results)
    }

    pub async fn get(&self, student_id: i64, exam_id: i64) -> Result<ExamResult> {
        let result = sqlx::query_as::<_, ExamResult>(
            r#"
            SELECT student_id, exam_id, score, completed_at
            FROM exam_results
            WHERE student_id = $1 AND exam_id = $2
            "#,
        )
        .bind(student_id)
        .bind(exam_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "No result for student {} on exam {}",
                student_id, exam_id
            ))
        })?;
        Ok(result)
    }
}
