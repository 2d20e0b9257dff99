// scoring.rs
use serde::{Deserialize, Serialize};

/// Season used when nothing has been configured yet.
pub const DEFAULT_SEASON: i64 = 1;

/// Final scores of one run, as stored by the score server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(rename = "key")]
    pub student_id: String,
    pub time_score: i64,
    pub action_score: i64,
    pub overall_score: i64,
    pub season: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayCount {
    pub id: String,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub season: i64,
}

/// Breakdown shown on the result screen and sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreCard {
    pub time_score: u32,
    pub action_score: u32,
    pub overall_score: u32,
}

impl ScoreCard {
    pub fn new(elapsed_ms: u32, grazes: u32, points_per_graze: u32) -> Self {
        let action_score = grazes.saturating_mul(points_per_graze);
        Self {
            time_score: elapsed_ms,
            action_score,
            overall_score: elapsed_ms.saturating_add(action_score),
        }
    }

    pub fn to_record(self, student_id: impl Into<String>, season: i64) -> ScoreRecord {
        ScoreRecord {
            student_id: student_id.into(),
            time_score: self.time_score as i64,
            action_score: self.action_score as i64,
            overall_score: self.overall_score as i64,
            season,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_is_time_plus_action() {
        let card = ScoreCard::new(20_000, 20, 100);
        assert_eq!(card.time_score, 20_000);
        assert_eq!(card.action_score, 2_000);
        assert_eq!(card.overall_score, 22_000);
    }

    #[test]
    fn record_serializes_student_id_as_key() {
        let record = ScoreCard::new(21_000, 0, 100).to_record("10102", 2);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["key"], "10102");
        assert_eq!(json["overall_score"], 21_000);
        assert_eq!(json["season"], 2);
        assert!(json.get("student_id").is_none());
    }
}
