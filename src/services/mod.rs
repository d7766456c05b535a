pub mod answer_sheet_service;
pub mod eligibility_service;
pub mod exam_result_service;
pub mod exam_service;
pub mod grading_service;
pub mod question_catalog_service;
pub mod question_stats_service;
pub mod submission_service;
