use async_graphql::{Enum, SimpleObject};
use serde::{Deserialize, Serialize};

use crate::models::domain::{problem::Difficulty, progress::UserProgress};

/// A stage on the pirate map. Ordered by `checkpoint_number`, which is unique.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct MapCheckpoint {
    pub checkpoint_number: i32,
    pub name: String,
    pub description: String,
    pub emoji: String,
    pub difficulty_level: i32, // 1..=5
    pub position_x: i32,       // percent of map width
    pub position_y: i32,       // percent of map height
    pub problems_to_unlock: i32,
    pub points_reward: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CheckpointStatus {
    Completed,
    Current,
    Locked,
}

impl MapCheckpoint {
    /// Problem difficulty served at this checkpoint.
    pub fn problem_difficulty(&self) -> Difficulty {
        match self.difficulty_level {
            i32::MIN..=2 => Difficulty::Easy,
            3..=4 => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }

    pub fn status_for(&self, progress: &UserProgress) -> CheckpointStatus {
        match progress.current_checkpoint {
            Some(current) if self.checkpoint_number < current => CheckpointStatus::Completed,
            Some(current) if self.checkpoint_number == current => CheckpointStatus::Current,
            Some(_) => CheckpointStatus::Locked,
            None if progress.total_checkpoints_completed > 0 => CheckpointStatus::Completed,
            None => CheckpointStatus::Locked,
        }
    }
}

#[cfg(test)]
impl MapCheckpoint {
    pub fn test_checkpoint(number: i32, required: i32, reward: i64) -> Self {
        MapCheckpoint {
            checkpoint_number: number,
            name: format!("Checkpoint {}", number),
            description: String::new(),
            emoji: "⛵".to_string(),
            difficulty_level: 1,
            position_x: 0,
            position_y: 0,
            problems_to_unlock: required,
            points_reward: reward,
        }
    }
}
