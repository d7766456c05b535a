use std::collections::BTreeMap;

use crate::models::answer_key::AnswerKey;
use crate::services::question_catalog_service::CatalogEntry;

pub struct GradingService;

#[derive(Debug, Clone)]
pub struct GradedAnswer {
    pub question_id: i32,
    pub correct: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GradingOutcome {
    pub graded: Vec<GradedAnswer>,
    pub correct_count: i32,
    /// Questions excluded from both score and stats: unknown identifier,
    /// or a catalog row without a usable key.
    pub skipped: Vec<i32>,
}

impl GradingOutcome {
    pub fn total_graded(&self) -> i32 {
        self.graded.len() as i32
    }

    /// Final score on the 0-100 scale, rounded to the nearest integer.
    /// 0 when nothing could be graded.
    pub fn score(&self) -> i32 {
        if self.graded.is_empty() {
            return 0;
        }
        (100.0 * self.correct_count as f64 / self.graded.len() as f64).round() as i32
    }
}

impl GradingService {
    /// Choice answers compare as a single case-sensitive label character;
    /// true/false answers compare case-insensitively.
    pub fn grade(key: &AnswerKey, submitted: &str) -> bool {
        match key {
            AnswerKey::Choice(label) => submitted == label,
            AnswerKey::Boolean(text) => submitted.eq_ignore_ascii_case(text),
        }
    }

    pub fn grade_all(
        catalog: &BTreeMap<i32, CatalogEntry>,
        answers: &BTreeMap<i32, String>,
    ) -> GradingOutcome {
        let mut outcome = GradingOutcome::default();

        for (question_id, submitted_text) in answers {
            match catalog.get(question_id).and_then(|entry| entry.key.as_ref()) {
                Some(key) => {
                    let correct = Self::grade(key, submitted_text);
                    if correct {
                        outcome.correct_count += 1;
                    }
                    outcome.graded.push(GradedAnswer {
                        question_id: *question_id,
                        correct,
                    });
                }
                None => outcome.skipped.push(*question_id),
            }
        }

        outcome
    }
}
