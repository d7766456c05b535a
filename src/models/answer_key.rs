use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::question::QuestionType;

/// Raw answer key row. Exactly one of the two fields is populated,
/// determined by the owning question's type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnswerKeyEntry {
    pub question_id: i32,
    pub choice_label: Option<String>,
    pub boolean_text: Option<String>,
}

/// Typed key used during grading. A row that does not match its question
/// type collapses to `None` and the question is excluded from scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    Choice(String),
    Boolean(String),
}

impl AnswerKey {
    pub fn from_parts(
        question_type: QuestionType,
        choice_label: Option<String>,
        boolean_text: Option<String>,
    ) -> Option<AnswerKey> {
        match question_type {
            QuestionType::Choice => choice_label.map(AnswerKey::Choice),
            QuestionType::Boolean => boolean_text.map(AnswerKey::Boolean),
        }
    }
}
