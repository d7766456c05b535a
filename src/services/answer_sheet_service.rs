use std::collections::BTreeMap;

use sqlx::{PgPool, Postgres, Transaction};

use crate::error::Result;
use crate::models::answer_sheet::AnswerSheetEntry;

#[derive(Clone)]
pub struct AnswerSheetService {
    pool: PgPool,
}

impl AnswerSheetService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends every submitted answer inside the caller's transaction.
    /// No deduplication here: attempt uniqueness is enforced upstream by
    /// the exam_results constraint, and these rows share the transaction's
    /// fate with the rest of the submission.
    pub async fn append_all(
        tx: &mut Transaction<'_, Postgres>,
        student_id: i64,
        exam_id: i64,
        answers: &BTreeMap<i32, String>,
    ) -> Result<()> {
        for (question_id, submitted_text) in answers {
            sqlx::query(
                r#"
                INSERT INTO answer_sheets (student_id, exam_id, question_id, submitted_text)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(student_id)
            .bind(exam_id)
            .bind(*question_id)
            .bind(submitted_text)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    pub async fn list_for_attempt(
        &self,
        student_id: i64,
        exam_id: i64,
    ) -> Result<Vec<AnswerSheetEntry>> {
        let entries = sqlx::query_as::<_, AnswerSheetEntry>(
            r#"
            SELECT id, student_id, exam_id, question_id, submitted_text, created_at
            FROM answer_sheets
            WHERE student_id = $1 AND exam_id = $2
            ORDER BY question_id
            "#,
        )
        .bind(student_id)
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
