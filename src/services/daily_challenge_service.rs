use std::sync::Arc;

use chrono::{Days, NaiveDate};

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{DailyChallenge, Difficulty, SubmissionSource, User},
        dto::response::{DailyChallengeDto, DailyChallengeResult},
    },
    repositories::{DailyChallengeRepository, ProblemFilter, ProblemRepository, ProfileRepository, UserRepository},
    services::{answer_checker, problem_service::ProblemService},
};

const MAX_STREAK_RETRIES: usize = 3;

pub struct DailyChallengeService {
    challenges: Arc<dyn DailyChallengeRepository>,
    problems: Arc<dyn ProblemRepository>,
    users: Arc<dyn UserRepository>,
    profiles: Arc<dyn ProfileRepository>,
    problem_service: Arc<ProblemService>,
    bonus_points: i64,
}

impl DailyChallengeService {
    pub fn new(
        challenges: Arc<dyn DailyChallengeRepository>,
        problems: Arc<dyn ProblemRepository>,
        users: Arc<dyn UserRepository>,
        profiles: Arc<dyn ProfileRepository>,
        problem_service: Arc<ProblemService>,
        bonus_points: i64,
    ) -> Self {
        Self {
            challenges,
            problems,
            users,
            profiles,
            problem_service,
            bonus_points,
        }
    }

    /// Hard problems are preferred; any problem will do otherwise.
    async fn pick_problem_id(&self) -> AppResult<Option<String>> {
        let hard = ProblemFilter {
            difficulty: Some(Difficulty::Hard),
            category: None,
        };

        if let Some(problem) = self.problems.sample(hard).await? {
            return Ok(Some(problem.id));
        }
        Ok(self
            .problems
            .sample(ProblemFilter::default())
            .await?
            .map(|p| p.id))
    }

    /// The challenge for `date`, created on first access. `None` when there
    /// are no problems to choose from.
    pub async fn get_or_create(&self, date: NaiveDate) -> AppResult<Option<DailyChallenge>> {
        if let Some(existing) = self.challenges.find_by_date(date).await? {
            return Ok(Some(existing));
        }

        let Some(problem_id) = self.pick_problem_id().await? else {
            log::warn!("No problems available for the {} daily challenge", date);
            return Ok(None);
        };

        match self
            .challenges
            .create(DailyChallenge::new(date, &problem_id, self.bonus_points))
            .await
        {
            Ok(created) => {
                log::info!("Created daily challenge for {} with problem {}", date, problem_id);
                Ok(Some(created))
            }
            Err(AppError::AlreadyExists(_)) => {
                log::debug!("Daily challenge for {} was created concurrently", date);
                self.challenges.find_by_date(date).await?.map(Some).ok_or_else(|| {
                    AppError::InternalError(format!("Daily challenge for {} vanished after conflict", date))
                })
            }
            Err(e) => Err(e),
        }
    }

    pub async fn todays_challenge(&self, user_id: &str, today: NaiveDate) -> AppResult<Option<DailyChallengeDto>> {
        let Some(challenge) = self.get_or_create(today).await? else {
            return Ok(None);
        };
        let problem = self.problem_service.get_problem(&challenge.problem_id).await?;
        Ok(Some(DailyChallengeDto::new(&challenge, problem, user_id)))
    }

    /// The user's profile is where a completion commits: bonus, streak and
    /// date land in one write. The challenge's completer list follows and is
    /// re-recorded on every later correct answer, so a failed write there
    /// heals on retry.
    pub async fn check_daily_challenge(
        &self,
        answer: &str,
        user_id: &str,
        today: NaiveDate,
    ) -> AppResult<DailyChallengeResult> {
        let challenge = self
            .get_or_create(today)
            .await?
            .ok_or_else(|| AppError::NotFound("No daily challenge is available today".to_string()))?;
        let problem = self.problem_service.get_problem(&challenge.problem_id).await?;

        let user = self.load_user(user_id).await?;
        let already_completed = challenge.is_completed_by(user_id)
            || user.profile.last_daily_challenge_date == Some(today);
        let check = answer_checker::check(answer, &problem.answer);
        self.problem_service
            .log_submission(&problem.id, answer, user_id, check.is_correct, SubmissionSource::DailyChallenge)
            .await?;

        if !check.is_correct {
            return Ok(DailyChallengeResult {
                correct: false,
                message: "Not quite right. Give it another try!".to_string(),
                bonus_awarded: 0,
                already_completed,
                current_streak: user.profile.current_streak,
            });
        }

        let completion = if already_completed {
            None
        } else {
            self.complete_for_user(user_id, today, challenge.bonus_points).await?
        };
        if self.challenges.mark_completed(today, user_id).await? {
            log::debug!("Recorded {} as a completer of the {} challenge", user_id, today);
        }

        let Some(streak) = completion else {
            return Ok(DailyChallengeResult {
                correct: true,
                message: "Correct! You already completed today's challenge.".to_string(),
                bonus_awarded: 0,
                already_completed: true,
                current_streak: self.load_user(user_id).await?.profile.current_streak,
            });
        };

        log::info!(
            "User {} completed the {} daily challenge (streak {})",
            user_id,
            today,
            streak
        );

        Ok(DailyChallengeResult {
            correct: true,
            message: format!(
                "Correct! You earned {} bonus points. Streak: {} day(s).",
                challenge.bonus_points, streak
            ),
            bonus_awarded: challenge.bonus_points,
            already_completed: false,
            current_streak: streak,
        })
    }

    async fn load_user(&self, user_id: &str) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", user_id)))
    }

    /// Pays `bonus` and extends the streak in a single profile write. `None`
    /// when the user had already completed `today`, including when a
    /// concurrent request got there first.
    async fn complete_for_user(&self, user_id: &str, today: NaiveDate, bonus: i64) -> AppResult<Option<i64>> {
        for _ in 0..MAX_STREAK_RETRIES {
            let user = self.load_user(user_id).await?;

            let update = user.profile.streak_after_completion(today);
            if !update.changed {
                return Ok(None);
            }
            if self
                .profiles
                .record_daily_completion(user_id, update.previous_date, today, update.streak, bonus)
                .await?
            {
                return Ok(Some(update.streak));
            }
            log::debug!("Profile of user {} changed concurrently, retrying", user_id);
        }

        Err(AppError::InternalError(format!(
            "Could not record the daily challenge for user {}",
            user_id
        )))
    }

    /// Creates challenges for the `days` days before `today`, skipping dates
    /// that already have one. Returns how many were created.
    pub async fn create_past_challenges(&self, days: u32, today: NaiveDate) -> AppResult<usize> {
        let mut created = 0;

        for offset in 1..=u64::from(days) {
            let Some(date) = today.checked_sub_days(Days::new(offset)) else {
                break;
            };
            if self.challenges.find_by_date(date).await?.is_some() {
                log::debug!("Daily challenge for {} already exists", date);
                continue;
            }
            let Some(problem_id) = self.pick_problem_id().await? else {
                log::warn!("No problems available; stopping at {}", date);
                break;
            };
            match self
                .challenges
                .create(DailyChallenge::new(date, &problem_id, self.bonus_points))
                .await
            {
                Ok(_) => created += 1,
                Err(AppError::AlreadyExists(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(created)
    }

    pub async fn recent_challenges(&self, limit: i64) -> AppResult<Vec<DailyChallenge>> {
        self.challenges.list_recent(limit).await
    }
}
