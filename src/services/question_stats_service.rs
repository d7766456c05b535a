use sqlx::{PgPool, Postgres, Transaction};

use crate::error::Result;
use crate::models::question_stat::QuestionStat;

#[derive(Clone)]
pub struct QuestionStatsService {
    pool: PgPool,
}

impl QuestionStatsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One server-side atomic increment per graded question. The counters
    /// and the rate move in the same statement, recomputed from the
    /// post-increment values, so no reader can observe one without the
    /// other and concurrent submissions never lose an update.
    pub async fn record_attempt(
        tx: &mut Transaction<'_, Postgres>,
        question_id: i32,
        exam_id: i64,
        was_correct: bool,
    ) -> Result<()> {
        let delta: i64 = if was_correct { 1 } else { 0 };

        sqlx::query(
            r#"
            INSERT INTO question_stats (question_id, exam_id, attempt_count, correct_count, correct_rate)
            VALUES ($1, $2, 1, $3, ROUND($3 * 100.0, 2))
            ON CONFLICT (question_id, exam_id) DO UPDATE
            SET attempt_count = question_stats.attempt_count + 1,
                correct_count = question_stats.correct_count + $3,
                correct_rate = ROUND(
                    (question_stats.correct_count + $3) * 100.0
                        / (question_stats.attempt_count + 1),
                    2
                )
            "#,
        )
        .bind(question_id)
        .bind(exam_id)
        .bind(delta)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    pub async fn list_for_exam(&self, exam_id: i64) -> Result<Vec<QuestionStat>> {
        let stats = sqlx::query_as::<_, QuestionStat>(
            r#"
            SELECT question_id, exam_id, attempt_count, correct_count, correct_rate
            FROM question_stats
            WHERE exam_id = $1
            ORDER BY question_id
            "#,
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }

    pub async fn get(&self, question_id: i32, exam_id: i64) -> Result<Option<QuestionStat>> {
        let stat = sqlx::query_as::<_, QuestionStat>(
            r#"
            SELECT question_id, exam_id, attempt_count, correct_count, correct_rate
            FROM question_stats
            WHERE question_id = $1 AND exam_id = $2
            "#,
        )
        .bind(question_id)
        .bind(exam_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(stat)
    }
}
