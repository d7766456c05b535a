use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use chrono::Utc;

use crate::dto::submission_dto::{PublicExamSummary, SubmitExamRequest, SubmitExamResponse};
use crate::error::Result;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/public/exams/{exam_id}",
    params(
        ("exam_id" = i64, Path, description = "Exam ID")
    ),
    responses(
        (status = 200, description = "Exam summary retrieved successfully", body = PublicExamSummary),
        (status = 404, description = "Exam not found")
    )
)]
#[axum::debug_handler]
pub async fn get_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let exam = state.exam_service.get_exam(exam_id).await?;
    let is_open = exam.is_open_at(Utc::now());
    Ok(Json(PublicExamSummary {
        id: exam.id,
        subject: exam.subject,
        open_at: exam.open_at,
        close_at: exam.close_at,
        duration_minutes: exam.duration_minutes,
        question_count: exam.question_count,
        is_open,
    }))
}

#[utoipa::path(
    post,
    path = "/api/public/exams/{exam_id}/submissions",
    params(
        ("exam_id" = i64, Path, description = "Exam ID")
    ),
    request_body = SubmitExamRequest,
    responses(
        (status = 200, description = "Submission graded and recorded", body = SubmitExamResponse),
        (status = 400, description = "Empty or invalid submission"),
        (status = 403, description = "Exam is not open for this student"),
        (status = 409, description = "Student has already submitted this exam")
    )
)]
#[axum::debug_handler]
pub async fn submit_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<i64>,
    Json(req): Json<SubmitExamRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!(
        "Submitting exam {} for student {}, answers: {}",
        exam_id,
        req.student_id,
        req.answers.len()
    );
    let resp = state.submission_service.submit_batch(exam_id, req).await?;
    Ok(Json(resp))
}
