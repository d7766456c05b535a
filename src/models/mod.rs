pub mod answer_key;
pub mod answer_sheet;
pub mod exam;
pub mod exam_result;
pub mod question;
pub mod question_stat;
