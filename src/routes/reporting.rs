use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};

use crate::dto::reporting_dto::{AnswerSheetResponse, ExamResultResponse, QuestionStatResponse};
use crate::error::Result;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/reporting/exams/{exam_id}/stats",
    params(
        ("exam_id" = i64, Path, description = "Exam ID")
    ),
    responses(
        (status = 200, description = "Per-question statistics retrieved successfully", body = Vec<QuestionStatResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_question_stats(
    State(state): State<AppState>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let stats = state.stats_service.list_for_exam(exam_id).await?;
    let response: Vec<QuestionStatResponse> =
        stats.into_iter().map(QuestionStatResponse::from).collect();
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/reporting/exams/{exam_id}/results",
    params(
        ("exam_id" = i64, Path, description = "Exam ID")
    ),
    responses(
        (status = 200, description = "Exam results retrieved successfully", body = Vec<ExamResultResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_exam_results(
    State(state): State<AppState>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let results = state.result_service.list_for_exam(exam_id).await?;
    let response: Vec<ExamResultResponse> =
        results.into_iter().map(ExamResultResponse::from).collect();
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/reporting/exams/{exam_id}/results/{student_id}",
    params(
        ("exam_id" = i64, Path, description = "Exam ID"),
        ("student_id" = i64, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Result retrieved successfully", body = ExamResultResponse),
        (status = 404, description = "No result for this student and exam")
    )
)]
#[axum::debug_handler]
pub async fn get_exam_result(
    State(state): State<AppState>,
    Path((exam_id, student_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    let result = state.result_service.get(student_id, exam_id).await?;
    Ok(Json(ExamResultResponse::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/reporting/exams/{exam_id}/answers/{student_id}",
    params(
        ("exam_id" = i64, Path, description = "Exam ID"),
        ("student_id" = i64, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Submitted answers retrieved successfully", body = Vec<AnswerSheetResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_submitted_answers(
    State(state): State<AppState>,
    Path((exam_id, student_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    let entries = state
        .sheet_service
        .list_for_attempt(student_id, exam_id)
        .await?;
    let response: Vec<AnswerSheetResponse> =
        entries.into_iter().map(AnswerSheetResponse::from).collect();
    Ok(Json(response))
}
