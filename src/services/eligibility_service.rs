use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::models::exam::Exam;

/// Decides whether a student may attempt an exam right now: the exam's
/// time window, plus the institutional cohort service when one is
/// configured. Consulted before any write happens.
#[derive(Clone)]
pub struct EligibilityService {
    pool: PgPool,
    remote_url: Option<String>,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct EligibilityDecision {
    eligible: bool,
}

impl EligibilityService {
    pub fn new(pool: PgPool, remote_url: Option<String>, http: reqwest::Client) -> Self {
        Self {
            pool,
            remote_url,
            http,
        }
    }

    pub async fn ensure_may_attempt(&self, student_id: i64, exam_id: i64) -> Result<Exam> {
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

        let now = Utc::now();
        if now < exam.open_at {
            return Err(Error::ExamClosed(format!(
                "Exam {} has not opened yet",
                exam_id
            )));
        }
        if now > exam.close_at {
            return Err(Error::ExamClosed(format!(
                "Exam {} is no longer open",
                exam_id
            )));
        }

        if let Some(base) = &self.remote_url {
            let url = format!(
                "{}/eligibility?student_id={}&exam_id={}",
                base.trim_end_matches('/'),
                student_id,
                exam_id
            );
            let decision: EligibilityDecision = self
                .http
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            if !decision.eligible {
                return Err(Error::ExamClosed(format!(
                    "Student {} may not attempt exam {}",
                    student_id, exam_id
                )));
            }
        }

        Ok(exam)
    }
}
