use async_graphql::SimpleObject;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::domain::{
    Category, CheckpointStatus, DailyChallenge, Difficulty, MapCheckpoint, Problem, Submission,
    User, UserProfile, UserProgress, UserRole,
};

/// A problem as shown to players; the answer is never included.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct ProblemDto {
    pub id: String,
    pub question: String,
    pub difficulty: Difficulty,
    pub category: Category,
    pub points: i64,
    pub solved_count: i64,
}

impl From<Problem> for ProblemDto {
    fn from(problem: Problem) -> Self {
        ProblemDto {
            points: problem.difficulty.points(),
            solved_count: problem.solved_by.len() as i64,
            id: problem.id,
            question: problem.question,
            difficulty: problem.difficulty,
            category: problem.category,
        }
    }
}

/// Full problem record for the admin surface.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct AdminProblemDto {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub category: Category,
    pub solved_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Problem> for AdminProblemDto {
    fn from(problem: Problem) -> Self {
        AdminProblemDto {
            solved_count: problem.solved_by.len() as i64,
            id: problem.id,
            question: problem.question,
            answer: problem.answer,
            difficulty: problem.difficulty,
            category: problem.category,
            created_at: problem.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct ProblemPage {
    pub items: Vec<ProblemDto>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

/// A freshly generated arithmetic exercise. Not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct GeneratedProblemDto {
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct CheckAnswerResult {
    pub correct: bool,
    pub message: String,
    pub correct_answer: Option<String>,
    pub points_awarded: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct DailyChallengeResult {
    pub correct: bool,
    pub message: String,
    pub bonus_awarded: i64,
    pub already_completed: bool,
    pub current_streak: i64,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct DailyChallengeDto {
    pub date: NaiveDate,
    pub problem: ProblemDto,
    pub bonus_points: i64,
    pub completed: bool,
    pub completions: i64,
}

impl DailyChallengeDto {
    pub fn new(challenge: &DailyChallenge, problem: Problem, user_id: &str) -> Self {
        DailyChallengeDto {
            date: challenge.date,
            problem: problem.into(),
            bonus_points: challenge.bonus_points,
            completed: challenge.is_completed_by(user_id),
            completions: challenge.completed_by.len() as i64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct MapSolveResult {
    pub correct: bool,
    pub advanced: bool,
    /// Name of the checkpoint this solve completed, if any.
    pub checkpoint_completed: Option<String>,
    pub points_awarded: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct AdvanceResult {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct CheckpointView {
    #[graphql(flatten)]
    #[serde(flatten)]
    pub checkpoint: MapCheckpoint,
    pub status: CheckpointStatus,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct MapView {
    pub checkpoints: Vec<CheckpointView>,
    pub progress: UserProgress,
    pub journey_complete: bool,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub profile: UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            profile: user.profile,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct UserPage {
    pub items: Vec<UserDto>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in_hours: i64,
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct MeDto {
    pub user: UserDto,
    pub progress: UserProgress,
    pub rank: i64,
    pub total_submissions: i64,
    pub correct_submissions: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub username: String,
    pub avatar: String,
    pub points: i64,
    pub current_streak: i64,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct LeaderboardDto {
    pub entries: Vec<LeaderboardEntry>,
    pub my_rank: Option<i64>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct SubmissionPage {
    pub items: Vec<Submission>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, SimpleObject)]
pub struct GenerationReport {
    pub requested: i64,
    pub created: i64,
    pub duplicates_skipped: i64,
    pub lines_discarded: i64,
}

#[derive(Debug, Serialize, SimpleObject)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
