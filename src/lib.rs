pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use crate::services::{
    answer_sheet_service::AnswerSheetService, eligibility_service::EligibilityService,
    exam_result_service::ExamResultService, exam_service::ExamService,
    question_stats_service::QuestionStatsService, submission_service::SubmissionService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub exam_service: ExamService,
    pub submission_service: SubmissionService,
    pub stats_service: QuestionStatsService,
    pub result_service: ExamResultService,
    pub sheet_service: AnswerSheetService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        let exam_service = ExamService::new(pool.clone());
        let eligibility_service = EligibilityService::new(
            pool.clone(),
            config.eligibility_service_url.clone(),
            http_client,
        );
        let submission_service = SubmissionService::new(pool.clone(), eligibility_service);
        let stats_service = QuestionStatsService::new(pool.clone());
        let result_service = ExamResultService::new(pool.clone());
        let sheet_service = AnswerSheetService::new(pool.clone());

        Self {
            pool,
            exam_service,
            submission_service,
            stats_service,
            result_service,
            sheet_service,
        }
    }
}
