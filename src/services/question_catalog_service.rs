use std::collections::BTreeMap;

use sqlx::{Postgres, Transaction};

use crate::error::Result;
use crate::models::answer_key::{AnswerKey, AnswerKeyEntry};
use crate::models::question::{Question, QuestionType};

/// Question type plus its typed key, as consulted during grading.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub question_type: QuestionType,
    pub key: Option<AnswerKey>,
}

pub struct QuestionCatalogService;

impl QuestionCatalogService {
    /// Loads every question of the exam with its answer key. A question
    /// whose key row is missing or mismatched keeps a `None` key and is
    /// reported back by the grader as skipped.
    pub async fn load_for_exam(
        tx: &mut Transaction<'_, Postgres>,
        exam_id: i64,
    ) -> Result<BTreeMap<i32, CatalogEntry>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, exam_id, question_type, prompt
            FROM questions
            WHERE exam_id = $1
            "#,
        )
        .bind(exam_id)
        .fetch_all(&mut **tx)
        .await?;

        let key_rows = sqlx::query_as::<_, AnswerKeyEntry>(
            r#"
            SELECT k.question_id, k.choice_label, k.boolean_text
            FROM answer_keys k
            JOIN questions q ON q.id = k.question_id
            WHERE q.exam_id = $1
            "#,
        )
        .bind(exam_id)
        .fetch_all(&mut **tx)
        .await?;

        let mut keys: BTreeMap<i32, AnswerKeyEntry> = key_rows
            .into_iter()
            .map(|row| (row.question_id, row))
            .collect();

        let mut catalog = BTreeMap::new();
        for question in questions {
            let key = keys.remove(&question.id).and_then(|row| {
                AnswerKey::from_parts(question.question_type, row.choice_label, row.boolean_text)
            });
            catalog.insert(
                question.id,
                CatalogEntry {
                    question_type: question.question_type,
                    key,
                },
            );
        }
        Ok(catalog)
    }
}
