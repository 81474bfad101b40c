use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One answer attempt. Written once, never edited.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Submission {
    pub id: String,
    pub user_id: String,
    pub problem_id: String,
    pub submitted_answer: String,
    pub was_correct: bool,
    pub source: SubmissionSource,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionSource {
    Practice,
    DailyChallenge,
    Map,
}

impl Submission {
    pub fn record(
        user_id: &str,
        problem_id: &str,
        submitted_answer: &str,
        was_correct: bool,
        source: SubmissionSource,
    ) -> Self {
        Submission {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            problem_id: problem_id.to_string(),
            submitted_answer: submitted_answer.to_string(),
            was_correct,
            source,
            submitted_at: Utc::now(),
        }
    }
}
