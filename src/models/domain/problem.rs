use std::{fmt, str::FromStr};

use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Problem {
    pub id: String,
    pub question: String,
    pub answer: String, // canonical answer, may be "12", "0.5" or "2/3"
    pub difficulty: Difficulty,
    pub category: Category,
    #[serde(default)]
    pub solved_by: Vec<String>, // user ids
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Arithmetic,
    Algebra,
    Fractions,
}

impl Problem {
    pub fn new(question: &str, answer: &str, difficulty: Difficulty, category: Category) -> Self {
        Problem {
            id: Uuid::new_v4().to_string(),
            question: question.trim().to_string(),
            answer: answer.trim().to_string(),
            difficulty,
            category,
            solved_by: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_solved_by(&self, user_id: &str) -> bool {
        self.solved_by.iter().any(|id| id == user_id)
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Points for a first correct solve.
    pub fn points(self) -> i64 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 10,
            Difficulty::Hard => 20,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Arithmetic, Category::Algebra, Category::Fractions];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Arithmetic => "arithmetic",
            Category::Algebra => "algebra",
            Category::Fractions => "fractions",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "arithmetic" => Ok(Category::Arithmetic),
            "algebra" => Ok(Category::Algebra),
            "fractions" => Ok(Category::Fractions),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}
