use chrono::Utc;
use sqlx::PgPool;
use validator::Validate;

use crate::dto::submission_dto::{SubmitExamRequest, SubmitExamResponse};
use crate::error::{Error, Result};
use crate::services::answer_sheet_service::AnswerSheetService;
use crate::services::eligibility_service::EligibilityService;
use crate::services::exam_result_service::ExamResultService;
use crate::services::grading_service::GradingService;
use crate::services::question_catalog_service::QuestionCatalogService;
use crate::services::question_stats_service::QuestionStatsService;

/// Orchestrates one exam attempt. The only component that opens a
/// transaction: answers, stats increments and the final result all
/// commit together or not at all.
#[derive(Clone)]
pub struct SubmissionService {
    pool: PgPool,
    eligibility_service: EligibilityService,
}

impl SubmissionService {
    pub fn new(pool: PgPool, eligibility_service: EligibilityService) -> Self {
        Self {
            pool,
            eligibility_service,
        }
    }

    pub async fn submit_batch(
        &self,
        exam_id: i64,
        req: SubmitExamRequest,
    ) -> Result<SubmitExamResponse> {
        req.validate()?;
        if req.answers.is_empty() {
            return Err(Error::BadRequest(
                "Submission contains no answers".to_string(),
            ));
        }

        let student_id = req.student_id;
        self.eligibility_service
            .ensure_may_attempt(student_id, exam_id)
            .await?;

        let mut tx = self.pool.begin().await?;

        // Advisory only. Two concurrent submissions from the same student
        // can both pass this; the primary key on exam_results settles it
        // at insert time.
        if ExamResultService::exists(&mut tx, student_id, exam_id).await? {
            return Err(Error::DuplicateAttempt);
        }

        AnswerSheetService::append_all(&mut tx, student_id, exam_id, &req.answers).await?;

        let catalog = QuestionCatalogService::load_for_exam(&mut tx, exam_id).await?;
        let outcome = GradingService::grade_all(&catalog, &req.answers);

        for question_id in &outcome.skipped {
            tracing::warn!(
                "Question {} on exam {} has no usable answer key; excluded from score and stats",
                question_id,
                exam_id
            );
        }

        // Ascending question order; concurrent submissions touching the
        // same stat rows then lock them in the same order.
        for graded in &outcome.graded {
            QuestionStatsService::record_attempt(&mut tx, graded.question_id, exam_id, graded.correct)
                .await?;
        }

        let score = outcome.score();
        let completed_at = Utc::now();
        ExamResultService::insert(&mut tx, student_id, exam_id, score, completed_at).await?;

        tx.commit().await?;

        tracing::info!(
            "Exam {} submission recorded for student {}: score={}, graded={}, skipped={}",
            exam_id,
            student_id,
            score,
            outcome.total_graded(),
            outcome.skipped.len()
        );

        Ok(SubmitExamResponse {
            exam_id,
            student_id,
            score,
            graded_questions: outcome.total_graded(),
            skipped_questions: outcome.skipped.len() as i32,
            completed_at,
            message: "Exam submitted successfully.".to_string(),
        })
    }
}
