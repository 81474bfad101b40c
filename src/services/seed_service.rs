use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    constants::seed_data::{builtin_problems, pirate_map},
    errors::{AppError, AppResult},
    models::{
        domain::{Category, DailyChallenge, Difficulty, Problem},
        dto::response::GenerationReport,
    },
    repositories::{CheckpointRepository, ProblemRepository},
    services::{daily_challenge_service::DailyChallengeService, problem_generator::ProblemGeneratorService},
};

/// Idempotent reference-data loading. Every operation can be re-run.
pub struct SeedService {
    problems: Arc<dyn ProblemRepository>,
    checkpoints: Arc<dyn CheckpointRepository>,
    daily: Arc<DailyChallengeService>,
    generator: Arc<ProblemGeneratorService>,
}

impl SeedService {
    pub fn new(
        problems: Arc<dyn ProblemRepository>,
        checkpoints: Arc<dyn CheckpointRepository>,
        daily: Arc<DailyChallengeService>,
        generator: Arc<ProblemGeneratorService>,
    ) -> Self {
        Self {
            problems,
            checkpoints,
            daily,
            generator,
        }
    }

    /// Inserts the built-in problems whose question is not stored yet.
    pub async fn seed_problems(&self) -> AppResult<usize> {
        let mut created = 0;

        for (difficulty, question, answer) in builtin_problems() {
            if self.problems.exists_by_question(question).await? {
                continue;
            }
            let problem = Problem::new(question, answer, difficulty, Category::Arithmetic);
            match self.problems.create(problem).await {
                Ok(_) => created += 1,
                Err(AppError::AlreadyExists(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        log::info!("Seeded {} new problems", created);
        Ok(created)
    }

    /// Upserts the pirate map by checkpoint number. Returns how many
    /// checkpoints were new.
    pub async fn seed_checkpoints(&self) -> AppResult<usize> {
        let mut inserted = 0;

        for checkpoint in pirate_map() {
            let label = format!("{} {}", checkpoint.emoji, checkpoint.name);
            if self.checkpoints.upsert(checkpoint).await? {
                log::info!("Created checkpoint {}", label);
                inserted += 1;
            } else {
                log::debug!("Updated checkpoint {}", label);
            }
        }

        Ok(inserted)
    }

    pub async fn seed_daily_challenge(&self, today: NaiveDate) -> AppResult<Option<DailyChallenge>> {
        self.daily.get_or_create(today).await
    }

    pub async fn seed_past_challenges(&self, days: u32, today: NaiveDate) -> AppResult<usize> {
        let created = self.daily.create_past_challenges(days, today).await?;
        log::info!("Created {} past daily challenges", created);
        Ok(created)
    }

    pub async fn generate(
        &self,
        count: u32,
        difficulty: Difficulty,
        category: Category,
    ) -> AppResult<GenerationReport> {
        self.generator.generate(count, difficulty, category).await
    }
}
