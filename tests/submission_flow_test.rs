use std::collections::BTreeMap;
use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

use examination_backend::error::Error;
use examination_backend::services::answer_sheet_service::AnswerSheetService;
use examination_backend::services::question_stats_service::QuestionStatsService;
use examination_backend::AppState;

fn init_test_env() {
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("PUBLIC_RPS", "1000");
    env::set_var("REPORTING_RPS", "1000");
    env::remove_var("ELIGIBILITY_SERVICE_URL");
    let _ = examination_backend::config::init_config();
}

async fn test_pool() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let Ok(database_url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database-backed test");
        return None;
    };
    init_test_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("test pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    Some(pool)
}

/// Seeds an open exam with one choice question (key "2") and one
/// true/false question (key "O"). Returns (exam_id, choice_id, bool_id).
async fn seed_open_exam(pool: &PgPool) -> (i64, i32, i32) {
    let now = Utc::now();
    let exam_id: i64 = sqlx::query_scalar(
        r#"INSERT INTO exams (subject, open_at, close_at, duration_minutes, question_count)
           VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
    )
    .bind("Data Structures")
    .bind(now - Duration::hours(1))
    .bind(now + Duration::hours(1))
    .bind(60)
    .bind(2)
    .fetch_one(pool)
    .await
    .expect("seed exam");

    let choice_id: i32 = sqlx::query_scalar(
        r#"INSERT INTO questions (exam_id, question_type, prompt)
           VALUES ($1, 'choice', 'Which option is correct?') RETURNING id"#,
    )
    .bind(exam_id)
    .fetch_one(pool)
    .await
    .expect("seed choice question");
    sqlx::query(r#"INSERT INTO answer_keys (question_id, choice_label) VALUES ($1, $2)"#)
        .bind(choice_id)
        .bind("2")
        .execute(pool)
        .await
        .expect("seed choice key");

    let bool_id: i32 = sqlx::query_scalar(
        r#"INSERT INTO questions (exam_id, question_type, prompt)
           VALUES ($1, 'boolean', 'A stack is LIFO.') RETURNING id"#,
    )
    .bind(exam_id)
    .fetch_one(pool)
    .await
    .expect("seed boolean question");
    sqlx::query(r#"INSERT INTO answer_keys (question_id, boolean_text) VALUES ($1, $2)"#)
        .bind(bool_id)
        .bind("O")
        .execute(pool)
        .await
        .expect("seed boolean key");

    (exam_id, choice_id, bool_id)
}

fn answers_json(pairs: &[(i32, &str)]) -> JsonValue {
    let mut map = serde_json::Map::new();
    for (question_id, text) in pairs {
        map.insert(question_id.to_string(), json!(text));
    }
    JsonValue::Object(map)
}

fn test_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/public/exams/:exam_id",
            get(examination_backend::routes::public::get_exam),
        )
        .route(
            "/api/public/exams/:exam_id/submissions",
            post(examination_backend::routes::public::submit_exam),
        )
        .route(
            "/api/reporting/exams/:exam_id/stats",
            get(examination_backend::routes::reporting::list_question_stats),
        )
        .route(
            "/api/reporting/exams/:exam_id/results/:student_id",
            get(examination_backend::routes::reporting::get_exam_result),
        )
        .with_state(state)
}

#[tokio::test]
async fn submission_flow_end_to_end() {
    let Some(pool) = test_pool().await else { return };
    let (exam_id, choice_id, bool_id) = seed_open_exam(&pool).await;
    let app = test_router(AppState::new(pool.clone()));

    let req = Request::builder()
        .method("GET")
        .uri(format!("/api/public/exams/{}", exam_id))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["is_open"], json!(true));

    // Student 7 answers both questions correctly.
    let submit_body = json!({
        "student_id": 7,
        "answers": answers_json(&[(choice_id, "2"), (bool_id, "O")])
    });
    let req = Request::builder()
        .method("POST")
        .uri(format!("/api/public/exams/{}/submissions", exam_id))
        .header("content-type", "application/json")
        .body(Body::from(submit_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["score"], json!(100));
    assert_eq!(body["graded_questions"], json!(2));

    // Student 8 answers both incorrectly.
    let submit_body = json!({
        "student_id": 8,
        "answers": answers_json(&[(choice_id, "1"), (bool_id, "X")])
    });
    let req = Request::builder()
        .method("POST")
        .uri(format!("/api/public/exams/{}/submissions", exam_id))
        .header("content-type", "application/json")
        .body(Body::from(submit_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["score"], json!(0));

    // Both questions now carry one correct and one incorrect attempt.
    let req = Request::builder()
        .method("GET")
        .uri(format!("/api/reporting/exams/{}/stats", exam_id))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let stats: Vec<JsonValue> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(stats.len(), 2);
    for stat in &stats {
        assert_eq!(stat["attempt_count"], json!(2));
        assert_eq!(stat["correct_count"], json!(1));
        assert_eq!(stat["correct_rate"], json!(50.0));
    }

    let req = Request::builder()
        .method("GET")
        .uri(format!("/api/reporting/exams/{}/results/7", exam_id))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["score"], json!(100));
}

#[tokio::test]
async fn second_submission_is_rejected_with_conflict() {
    let Some(pool) = test_pool().await else { return };
    let (exam_id, choice_id, bool_id) = seed_open_exam(&pool).await;
    let app = test_router(AppState::new(pool.clone()));

    let submit_body = json!({
        "student_id": 7,
        "answers": answers_json(&[(choice_id, "2"), (bool_id, "O")])
    });
    let req = Request::builder()
        .method("POST")
        .uri(format!("/api/public/exams/{}/submissions", exam_id))
        .header("content-type", "application/json")
        .body(Body::from(submit_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let before: i64 = sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM answer_sheets WHERE exam_id = $1 AND student_id = 7"#,
    )
    .bind(exam_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    let req = Request::builder()
        .method("POST")
        .uri(format!("/api/public/exams/{}/submissions", exam_id))
        .header("content-type", "application/json")
        .body(Body::from(submit_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // The rejected attempt left nothing behind.
    let after: i64 = sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM answer_sheets WHERE exam_id = $1 AND student_id = 7"#,
    )
    .bind(exam_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(before, after);

    let stats = QuestionStatsService::new(pool.clone())
        .get(choice_id, exam_id)
        .await
        .unwrap()
        .expect("stat row");
    assert_eq!(stats.attempt_count, 1);
}

#[tokio::test]
async fn empty_submission_is_rejected_before_any_write() {
    let Some(pool) = test_pool().await else { return };
    let (exam_id, _choice_id, _bool_id) = seed_open_exam(&pool).await;
    let app = test_router(AppState::new(pool.clone()));

    let submit_body = json!({ "student_id": 7, "answers": {} });
    let req = Request::builder()
        .method("POST")
        .uri(format!("/api/public/exams/{}/submissions", exam_id))
        .header("content-type", "application/json")
        .body(Body::from(submit_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let count: i64 =
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM answer_sheets WHERE exam_id = $1"#)
            .bind(exam_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn closed_exam_is_rejected() {
    let Some(pool) = test_pool().await else { return };
    let now = Utc::now();
    let exam_id: i64 = sqlx::query_scalar(
        r#"INSERT INTO exams (subject, open_at, close_at, duration_minutes, question_count)
           VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
    )
    .bind("History")
    .bind(now - Duration::hours(3))
    .bind(now - Duration::hours(1))
    .bind(60)
    .bind(0)
    .fetch_one(&pool)
    .await
    .expect("seed closed exam");

    let state = AppState::new(pool.clone());
    let mut answers = BTreeMap::new();
    answers.insert(1, "2".to_string());
    let err = state
        .submission_service
        .submit_batch(
            exam_id,
            examination_backend::dto::submission_dto::SubmitExamRequest {
                student_id: 7,
                answers,
            },
        )
        .await
        .expect_err("closed exam must be rejected");
    assert!(matches!(err, Error::ExamClosed(_)));
}

#[tokio::test]
async fn question_without_key_is_skipped_but_submission_succeeds() {
    let Some(pool) = test_pool().await else { return };
    let (exam_id, choice_id, bool_id) = seed_open_exam(&pool).await;

    // A question that never received a key row.
    let orphan_id: i32 = sqlx::query_scalar(
        r#"INSERT INTO questions (exam_id, question_type, prompt)
           VALUES ($1, 'choice', 'Key missing') RETURNING id"#,
    )
    .bind(exam_id)
    .fetch_one(&pool)
    .await
    .expect("seed orphan question");

    let state = AppState::new(pool.clone());
    let mut answers = BTreeMap::new();
    answers.insert(choice_id, "2".to_string());
    answers.insert(bool_id, "O".to_string());
    answers.insert(orphan_id, "1".to_string());

    let resp = state
        .submission_service
        .submit_batch(
            exam_id,
            examination_backend::dto::submission_dto::SubmitExamRequest {
                student_id: 7,
                answers,
            },
        )
        .await
        .expect("submission should proceed despite the missing key");

    assert_eq!(resp.score, 100);
    assert_eq!(resp.graded_questions, 2);
    assert_eq!(resp.skipped_questions, 1);

    // The keyless question gained no stat row.
    let orphan_stat = QuestionStatsService::new(pool.clone())
        .get(orphan_id, exam_id)
        .await
        .unwrap();
    assert!(orphan_stat.is_none());
}

#[tokio::test]
async fn fifty_concurrent_submissions_lose_no_updates() {
    let Some(pool) = test_pool().await else { return };
    let (exam_id, choice_id, bool_id) = seed_open_exam(&pool).await;
    let state = AppState::new(pool.clone());

    let mut handles = Vec::new();
    for student_id in 1..=50i64 {
        let service = state.submission_service.clone();
        // Students 1-30 answer the choice question correctly.
        let choice_answer = if student_id <= 30 { "2" } else { "1" };
        let mut answers = BTreeMap::new();
        answers.insert(choice_id, choice_answer.to_string());
        answers.insert(bool_id, "O".to_string());
        handles.push(tokio::spawn(async move {
            service
                .submit_batch(
                    exam_id,
                    examination_backend::dto::submission_dto::SubmitExamRequest {
                        student_id,
                        answers,
                    },
                )
                .await
        }));
    }

    for handle in handles {
        handle.await.expect("task").expect("submission");
    }

    let stats_service = QuestionStatsService::new(pool.clone());
    let choice_stat = stats_service
        .get(choice_id, exam_id)
        .await
        .unwrap()
        .expect("choice stat row");
    assert_eq!(choice_stat.attempt_count, 50);
    assert_eq!(choice_stat.correct_count, 30);
    assert_eq!(choice_stat.correct_rate, Decimal::new(6000, 2));

    let bool_stat = stats_service
        .get(bool_id, exam_id)
        .await
        .unwrap()
        .expect("boolean stat row");
    assert_eq!(bool_stat.attempt_count, 50);
    assert_eq!(bool_stat.correct_count, 50);
    assert_eq!(bool_stat.correct_rate, Decimal::new(10000, 2));

    let result_count: i64 =
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM exam_results WHERE exam_id = $1"#)
            .bind(exam_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(result_count, 50);
}

#[tokio::test]
async fn dropped_transaction_leaves_no_partial_state() {
    let Some(pool) = test_pool().await else { return };
    let (exam_id, choice_id, _bool_id) = seed_open_exam(&pool).await;

    let mut answers = BTreeMap::new();
    answers.insert(choice_id, "2".to_string());

    let mut tx = pool.begin().await.expect("begin");
    AnswerSheetService::append_all(&mut tx, 7001, exam_id, &answers)
        .await
        .expect("append inside tx");
    QuestionStatsService::record_attempt(&mut tx, choice_id, exam_id, true)
        .await
        .expect("stats inside tx");
    drop(tx); // rollback

    let sheet_count: i64 =
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM answer_sheets WHERE exam_id = $1"#)
            .bind(exam_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(sheet_count, 0);

    let stat = QuestionStatsService::new(pool.clone())
        .get(choice_id, exam_id)
        .await
        .unwrap();
    assert!(stat.is_none());
}

#[tokio::test]
async fn storage_failure_mid_submission_rolls_everything_back() {
    let Some(pool) = test_pool().await else { return };
    let (exam_id, choice_id, bool_id) = seed_open_exam(&pool).await;
    let state = AppState::new(pool.clone());

    // The second answer overflows the submitted_text column, so the
    // append fails after the first row was already written in the tx.
    let mut answers = BTreeMap::new();
    answers.insert(choice_id, "2".to_string());
    answers.insert(bool_id, "X".repeat(300));

    let err = state
        .submission_service
        .submit_batch(
            exam_id,
            examination_backend::dto::submission_dto::SubmitExamRequest {
                student_id: 7,
                answers,
            },
        )
        .await
        .expect_err("oversized answer must abort the submission");
    assert!(matches!(err, Error::Database(_)));

    let sheet_count: i64 = sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM answer_sheets WHERE exam_id = $1 AND student_id = 7"#,
    )
    .bind(exam_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(sheet_count, 0);

    let result: Option<i32> = sqlx::query_scalar(
        r#"SELECT score FROM exam_results WHERE exam_id = $1 AND student_id = 7"#,
    )
    .bind(exam_id)
    .fetch_optional(&pool)
    .await
    .unwrap();
    assert!(result.is_none());
}
