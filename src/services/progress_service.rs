use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{
            progress::{Advancement, SolveOutcome},
            MapCheckpoint, Problem, SubmissionSource, UserProgress,
        },
        dto::response::{AdvanceResult, CheckpointView, MapSolveResult, MapView},
    },
    repositories::{CheckpointRepository, ProblemFilter, ProgressRepository},
    services::problem_service::ProblemService,
};

const MAX_PROGRESS_RETRIES: usize = 5;

pub struct ProgressService {
    checkpoints: Arc<dyn CheckpointRepository>,
    progress: Arc<dyn ProgressRepository>,
    problem_service: Arc<ProblemService>,
}

impl ProgressService {
    pub fn new(
        checkpoints: Arc<dyn CheckpointRepository>,
        progress: Arc<dyn ProgressRepository>,
        problem_service: Arc<ProblemService>,
    ) -> Self {
        Self {
            checkpoints,
            progress,
            problem_service,
        }
    }

    /// Progress for a new account: the first checkpoint, or none when the map
    /// is empty.
    pub async fn initial_progress(&self) -> AppResult<UserProgress> {
        let map = self.checkpoints.list_all().await?;
        Ok(UserProgress::starting_at(map.first()))
    }

    async fn load_progress(&self, user_id: &str) -> AppResult<UserProgress> {
        self.progress
            .find_progress(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", user_id)))
    }

    /// Applies `change` to the stored progress with optimistic concurrency.
    /// `change` returns its result and the points it earns; the points are
    /// written together with the progress. On a lost race the progress is
    /// reloaded and `change` re-evaluated, so concurrent identical requests
    /// converge.
    async fn update_progress<T, F>(
        &self,
        user_id: &str,
        map: &[MapCheckpoint],
        mut change: F,
    ) -> AppResult<(T, UserProgress)>
    where
        F: FnMut(&mut UserProgress, &[MapCheckpoint]) -> (T, i64) + Send,
        T: Send,
    {
        for attempt in 1..=MAX_PROGRESS_RETRIES {
            let original = self.load_progress(user_id).await?;
            let mut updated = original.clone();
            let (result, reward) = change(&mut updated, map);

            if updated == original {
                return Ok((result, updated));
            }
            if self
                .progress
                .save_progress(user_id, &updated, original.version, reward)
                .await?
            {
                updated.version = original.version + 1;
                return Ok((result, updated));
            }
            log::debug!(
                "Progress for user {} changed concurrently (attempt {}), retrying",
                user_id,
                attempt
            );
        }

        Err(AppError::InternalError(format!(
            "Could not update progress for user {}",
            user_id
        )))
    }

    fn log_advancement(user_id: &str, advancement: &Advancement) {
        log::info!(
            "User {} completed checkpoint {} (+{} points)",
            user_id,
            advancement.completed_checkpoint,
            advancement.points_reward
        );
    }

    pub async fn map_view(&self, user_id: &str) -> AppResult<MapView> {
        let map = self.checkpoints.list_all().await?;
        let progress = self.load_progress(user_id).await?;

        let checkpoints = map
            .into_iter()
            .map(|checkpoint| CheckpointView {
                status: checkpoint.status_for(&progress),
                checkpoint,
            })
            .collect();

        Ok(MapView {
            checkpoints,
            journey_complete: progress.is_journey_complete(),
            progress,
        })
    }

    /// A random problem for the current checkpoint. Problems not yet counted
    /// there come first, matching the checkpoint's difficulty before any
    /// other; a counted one is served only when nothing else is left.
    pub async fn next_map_problem(&self, user_id: &str) -> AppResult<Problem> {
        let map = self.checkpoints.list_all().await?;
        let progress = self.load_progress(user_id).await?;
        let checkpoint = progress.current(&map).ok_or_else(|| {
            AppError::BadRequest("You have no active checkpoint on the map".to_string())
        })?;

        let matching = ProblemFilter {
            difficulty: Some(checkpoint.problem_difficulty()),
            category: None,
        };
        let any = ProblemFilter::default();
        let counted = progress.counted_problem_ids.as_slice();
        let nothing: &[String] = &[];

        for (filter, exclude) in [(matching, counted), (any, counted), (matching, nothing), (any, nothing)] {
            if let Some(problem) = self.problem_service.sample_problem(filter, exclude).await? {
                return Ok(problem);
            }
        }
        Err(AppError::NotFound("No problems are available for the map".to_string()))
    }

    /// True when `problem_id` is already counted at the current checkpoint and
    /// every other problem is too, so a repeat is the only way forward.
    async fn repeat_allowed(&self, user_id: &str, problem_id: &str) -> AppResult<bool> {
        let progress = self.load_progress(user_id).await?;
        if !progress.has_counted(problem_id) {
            return Ok(false);
        }
        let fresh = self
            .problem_service
            .sample_problem(ProblemFilter::default(), &progress.counted_problem_ids)
            .await?;
        Ok(fresh.is_none())
    }

    pub async fn solve_map_problem(&self, problem_id: &str, answer: &str, user_id: &str) -> AppResult<MapSolveResult> {
        let problem = self.problem_service.get_problem(problem_id).await?;
        let attempt = self
            .problem_service
            .score_attempt(&problem, answer, user_id, SubmissionSource::Map)
            .await?;

        if !attempt.correct {
            return Ok(MapSolveResult {
                correct: false,
                advanced: false,
                checkpoint_completed: None,
                points_awarded: 0,
                message: format!("Not quite. The correct answer is {}.", attempt.correct_answer),
            });
        }

        let map = self.checkpoints.list_all().await?;
        let repeat = self.repeat_allowed(user_id, &problem.id).await?;
        let (outcome, progress) = self
            .update_progress(user_id, &map, |p, map| {
                let outcome = if repeat {
                    p.record_repeat_solve(&problem.id, map)
                } else {
                    p.record_solve(&problem.id, map)
                };
                let reward = outcome.advancement().map_or(0, |a| a.points_reward);
                (outcome, reward)
            })
            .await?;

        let mut points_awarded = attempt.points_awarded;
        let result = match outcome {
            SolveOutcome::Counted {
                advanced: Some(advancement),
            } => {
                Self::log_advancement(user_id, &advancement);
                points_awarded += advancement.points_reward;
                let name = checkpoint_name(&map, advancement.completed_checkpoint);
                let message = match advancement.next_checkpoint {
                    Some(next) => format!(
                        "Correct! You conquered {} and earned {} points. Next stop: {}.",
                        name,
                        advancement.points_reward,
                        checkpoint_name(&map, next)
                    ),
                    None => format!(
                        "Correct! You conquered {} and completed the journey!",
                        name
                    ),
                };
                MapSolveResult {
                    correct: true,
                    advanced: true,
                    checkpoint_completed: Some(name),
                    points_awarded,
                    message,
                }
            }
            SolveOutcome::Counted { advanced: None } => {
                let remaining = progress
                    .current(&map)
                    .map(|c| c.problems_to_unlock - progress.problems_solved_at_current)
                    .unwrap_or(0);
                MapSolveResult {
                    correct: true,
                    advanced: false,
                    checkpoint_completed: None,
                    points_awarded,
                    message: format!("Correct! {} more to reach the next checkpoint.", remaining),
                }
            }
            SolveOutcome::AlreadyCounted => MapSolveResult {
                correct: true,
                advanced: false,
                checkpoint_completed: None,
                points_awarded,
                message: "Correct! This problem already counts toward your checkpoint.".to_string(),
            },
            SolveOutcome::Idle => MapSolveResult {
                correct: true,
                advanced: false,
                checkpoint_completed: None,
                points_awarded,
                message: "Correct! You have no active checkpoint on the map.".to_string(),
            },
        };

        Ok(result)
    }

    pub async fn advance_checkpoint(&self, user_id: &str) -> AppResult<AdvanceResult> {
        let map = self.checkpoints.list_all().await?;
        let (advanced, progress) = self
            .update_progress(user_id, &map, |p, map| {
                let advanced = p.advance(map);
                let reward = advanced.map_or(0, |a| a.points_reward);
                (advanced, reward)
            })
            .await?;

        if let Some(advancement) = advanced {
            Self::log_advancement(user_id, &advancement);
            return Ok(AdvanceResult {
                success: true,
                message: format!(
                    "You conquered {} and earned {} points!",
                    checkpoint_name(&map, advancement.completed_checkpoint),
                    advancement.points_reward
                ),
            });
        }

        let message = match progress.current(&map) {
            Some(current) => format!(
                "Solve {} more problem(s) to complete {}.",
                current.problems_to_unlock - progress.problems_solved_at_current,
                current.name
            ),
            None if progress.is_journey_complete() => {
                "Your journey is complete. There are no more checkpoints.".to_string()
            }
            None => "You have no active checkpoint on the map.".to_string(),
        };

        Ok(AdvanceResult {
            success: false,
            message,
        })
    }

    /// Puts the user back on the first checkpoint. Lifetime totals are kept.
    pub async fn restart_journey(&self, user_id: &str) -> AppResult<UserProgress> {
        let map = self.checkpoints.list_all().await?;
        if map.is_empty() {
            return Err(AppError::BadRequest("The map has no checkpoints".to_string()));
        }

        let (_, progress) = self
            .update_progress(user_id, &map, |p, map| (p.restart(map.first()), 0))
            .await?;
        log::info!("User {} restarted the map journey", user_id);
        Ok(progress)
    }
}

fn checkpoint_name(map: &[MapCheckpoint], number: i32) -> String {
    map.iter()
        .find(|c| c.checkpoint_number == number)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| format!("checkpoint {}", number))
}
