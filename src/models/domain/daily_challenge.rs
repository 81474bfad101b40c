use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BONUS_POINTS: i64 = 10;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DailyChallenge {
    pub date: NaiveDate, // unique
    pub problem_id: String,
    pub bonus_points: i64,
    #[serde(default)]
    pub completed_by: Vec<String>, // user ids
    pub created_at: DateTime<Utc>,
}

impl DailyChallenge {
    pub fn new(date: NaiveDate, problem_id: &str, bonus_points: i64) -> Self {
        DailyChallenge {
            date,
            problem_id: problem_id.to_string(),
            bonus_points,
            completed_by: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_completed_by(&self, user_id: &str) -> bool {
        self.completed_by.iter().any(|id| id == user_id)
    }
}
