use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Running per-question counters. The only row in the system with
/// concurrent writers from unrelated submissions; mutated exclusively
/// through the atomic upsert in QuestionStatsService.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionStat {
    pub question_id: i32,
    pub exam_id: i64,
    pub attempt_count: i64,
    pub correct_count: i64,
    pub correct_rate: Decimal,
}
