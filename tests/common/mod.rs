#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::SecretString;
use tokio::sync::RwLock;

use pbmate_server::{
    app_state::{AppState, Repositories},
    config::Config,
    errors::{AppError, AppResult},
    models::{
        domain::{
            Category, DailyChallenge, Difficulty, MapCheckpoint, Problem, Submission, User,
            UserProgress, UserRole,
        },
        dto::{request::RegisterRequest, response::AuthResponse},
    },
    repositories::{
        CheckpointRepository, DailyChallengeRepository, ProblemFilter, ProblemRepository,
        ProfileRepository, ProgressRepository, SubmissionRepository, SubmissionStats,
        UserRepository,
    },
    services::problem_generator::ProblemSource,
};

fn page<T>(items: Vec<T>, offset: i64, limit: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[derive(Default)]
pub struct InMemoryProblemRepository {
    problems: Arc<RwLock<HashMap<String, Problem>>>,
}

impl InMemoryProblemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Problem> {
        self.problems.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl ProblemRepository for InMemoryProblemRepository {
    async fn create(&self, problem: Problem) -> AppResult<Problem> {
        let mut problems = self.problems.write().await;
        let duplicate = problems.contains_key(&problem.id)
            || problems
                .values()
                .any(|p| p.question.eq_ignore_ascii_case(&problem.question));
        if duplicate {
            return Err(AppError::AlreadyExists(format!(
                "Problem '{}' already exists",
                problem.question
            )));
        }
        problems.insert(problem.id.clone(), problem.clone());
        Ok(problem)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Problem>> {
        Ok(self.problems.read().await.get(id).cloned())
    }

    async fn exists_by_question(&self, question: &str) -> AppResult<bool> {
        let question = question.trim();
        Ok(self
            .problems
            .read()
            .await
            .values()
            .any(|p| p.question.eq_ignore_ascii_case(question)))
    }

    async fn list(&self, filter: ProblemFilter, offset: i64, limit: i64) -> AppResult<(Vec<Problem>, i64)> {
        let problems = self.problems.read().await;
        let mut items: Vec<Problem> = problems.values().filter(|p| filter.matches(p)).cloned().collect();
        items.sort_by(|a, b| a.question.cmp(&b.question));

        let total = items.len() as i64;
        Ok((page(items, offset, limit), total))
    }

    async fn sample_excluding(&self, filter: ProblemFilter, exclude: &[String]) -> AppResult<Option<Problem>> {
        let problems = self.problems.read().await;
        let mut matching: Vec<&Problem> = problems
            .values()
            .filter(|p| filter.matches(p) && !exclude.contains(&p.id))
            .collect();
        matching.sort_by(|a, b| a.question.cmp(&b.question));
        Ok(matching.first().map(|p| (*p).clone()))
    }

    async fn update(&self, problem: Problem) -> AppResult<Problem> {
        let mut problems = self.problems.write().await;
        let stored = problems
            .get_mut(&problem.id)
            .ok_or_else(|| AppError::NotFound(format!("Problem with id '{}' not found", problem.id)))?;
        stored.question = problem.question.clone();
        stored.answer = problem.answer.clone();
        stored.difficulty = problem.difficulty;
        stored.category = problem.category;
        Ok(problem)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.problems
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Problem with id '{}' not found", id)))
    }

    async fn mark_solved(&self, problem_id: &str, user_id: &str) -> AppResult<bool> {
        let mut problems = self.problems.write().await;
        match problems.get_mut(problem_id) {
            Some(problem) if !problem.is_solved_by(user_id) => {
                problem.solved_by.push(user_id.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn unmark_solved(&self, problem_id: &str, user_id: &str) -> AppResult<()> {
        if let Some(problem) = self.problems.write().await.get_mut(problem_id) {
            problem.solved_by.retain(|id| id != user_id);
        }
        Ok(())
    }

    async fn count(&self, filter: ProblemFilter) -> AppResult<i64> {
        let problems = self.problems.read().await;
        Ok(problems.values().filter(|p| filter.matches(p)).count() as i64)
    }
}

#[derive(Default)]
pub struct InMemorySubmissionRepository {
    submissions: Arc<RwLock<Vec<Submission>>>,
}

impl InMemorySubmissionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.submissions.read().await.len()
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn create(&self, submission: Submission) -> AppResult<Submission> {
        let mut submissions = self.submissions.write().await;
        if submissions.iter().any(|s| s.id == submission.id) {
            return Err(AppError::AlreadyExists(format!(
                "Submission with id '{}' already exists",
                submission.id
            )));
        }
        submissions.push(submission.clone());
        Ok(submission)
    }

    async fn list_by_user(&self, user_id: &str, offset: i64, limit: i64) -> AppResult<(Vec<Submission>, i64)> {
        let submissions = self.submissions.read().await;
        // Newest first; insertion order breaks timestamp ties.
        let items: Vec<Submission> = submissions
            .iter()
            .rev()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();

        let total = items.len() as i64;
        Ok((page(items, offset, limit), total))
    }

    async fn stats_for_user(&self, user_id: &str) -> AppResult<SubmissionStats> {
        let submissions = self.submissions.read().await;
        let mine: Vec<&Submission> = submissions.iter().filter(|s| s.user_id == user_id).collect();
        Ok(SubmissionStats {
            total: mine.len() as i64,
            correct: mine.iter().filter(|s| s.was_correct).count() as i64,
        })
    }
}

/// Users with their embedded profile and progress. Implements the account,
/// profile and progress repositories over the same map, like the single
/// users collection does.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }
}

fn user_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("User with id '{}' not found", id))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        let duplicate = users.values().any(|u| {
            u.id == user.id || u.username == user.username || u.email == user.email
        });
        if duplicate {
            return Err(AppError::AlreadyExists(format!(
                "User '{}' already exists",
                user.username
            )));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_lowercase();
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_all_paginated(&self, offset: i64, limit: i64) -> AppResult<(Vec<User>, i64)> {
        let users = self.users.read().await;
        let mut items: Vec<User> = users.values().cloned().collect();
        items.sort_by(|a, b| a.username.cmp(&b.username));

        let total = items.len() as i64;
        Ok((page(items, offset, limit), total))
    }

    async fn update_account(&self, id: &str, username: &str, email: &str) -> AppResult<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(id).ok_or_else(|| user_not_found(id))?;
        user.username = username.to_string();
        user.email = email.to_lowercase();
        Ok(user.clone())
    }

    async fn set_role(&self, id: &str, role: UserRole) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(id).ok_or_else(|| user_not_found(id))?;
        user.role = role;
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| user_not_found(id))
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.users.read().await.len() as i64)
    }
}

#[async_trait]
impl ProfileRepository for InMemoryUserRepository {
    async fn award_points(&self, user_id: &str, amount: i64) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(user_id).ok_or_else(|| user_not_found(user_id))?;
        user.profile.award_points(amount);
        Ok(())
    }

    async fn record_daily_completion(
        &self,
        user_id: &str,
        previous_date: Option<NaiveDate>,
        today: NaiveDate,
        streak: i64,
        bonus: i64,
    ) -> AppResult<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(user_id) {
            Some(user) if user.profile.last_daily_challenge_date == previous_date => {
                user.profile.last_daily_challenge_date = Some(today);
                user.profile.current_streak = streak;
                user.profile.award_points(bonus);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn leaderboard(&self, limit: i64) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let mut items: Vec<User> = users.values().cloned().collect();
        items.sort_by(|a, b| {
            b.profile
                .points
                .cmp(&a.profile.points)
                .then_with(|| a.username.cmp(&b.username))
        });
        Ok(page(items, 0, limit))
    }

    async fn rank_of(&self, points: i64) -> AppResult<i64> {
        let users = self.users.read().await;
        let ahead = users.values().filter(|u| u.profile.points > points).count();
        Ok(ahead as i64 + 1)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryUserRepository {
    async fn find_progress(&self, user_id: &str) -> AppResult<Option<UserProgress>> {
        Ok(self.users.read().await.get(user_id).map(|u| u.progress.clone()))
    }

    async fn save_progress(
        &self,
        user_id: &str,
        progress: &UserProgress,
        expected_version: i64,
        reward: i64,
    ) -> AppResult<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(user_id) {
            Some(user) if user.progress.version == expected_version => {
                user.progress = progress.clone();
                user.progress.version = expected_version + 1;
                user.profile.award_points(reward);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryDailyChallengeRepository {
    challenges: Arc<RwLock<HashMap<NaiveDate, DailyChallenge>>>,
}

impl InMemoryDailyChallengeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DailyChallengeRepository for InMemoryDailyChallengeRepository {
    async fn find_by_date(&self, date: NaiveDate) -> AppResult<Option<DailyChallenge>> {
        Ok(self.challenges.read().await.get(&date).cloned())
    }

    async fn create(&self, challenge: DailyChallenge) -> AppResult<DailyChallenge> {
        let mut challenges = self.challenges.write().await;
        if challenges.contains_key(&challenge.date) {
            return Err(AppError::AlreadyExists(format!(
                "Daily challenge for {} already exists",
                challenge.date
            )));
        }
        challenges.insert(challenge.date, challenge.clone());
        Ok(challenge)
    }

    async fn mark_completed(&self, date: NaiveDate, user_id: &str) -> AppResult<bool> {
        let mut challenges = self.challenges.write().await;
        match challenges.get_mut(&date) {
            Some(challenge) if !challenge.is_completed_by(user_id) => {
                challenge.completed_by.push(user_id.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<DailyChallenge>> {
        let challenges = self.challenges.read().await;
        let mut items: Vec<DailyChallenge> = challenges.values().cloned().collect();
        items.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(page(items, 0, limit))
    }
}

#[derive(Default)]
pub struct InMemoryCheckpointRepository {
    checkpoints: Arc<RwLock<Vec<MapCheckpoint>>>,
}

impl InMemoryCheckpointRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointRepository for InMemoryCheckpointRepository {
    async fn list_all(&self) -> AppResult<Vec<MapCheckpoint>> {
        let mut items = self.checkpoints.read().await.clone();
        items.sort_by_key(|c| c.checkpoint_number);
        Ok(items)
    }

    async fn find_by_number(&self, number: i32) -> AppResult<Option<MapCheckpoint>> {
        let checkpoints = self.checkpoints.read().await;
        Ok(checkpoints.iter().find(|c| c.checkpoint_number == number).cloned())
    }

    async fn upsert(&self, checkpoint: MapCheckpoint) -> AppResult<bool> {
        let mut checkpoints = self.checkpoints.write().await;
        match checkpoints
            .iter_mut()
            .find(|c| c.checkpoint_number == checkpoint.checkpoint_number)
        {
            Some(existing) => {
                *existing = checkpoint;
                Ok(false)
            }
            None => {
                checkpoints.push(checkpoint);
                Ok(true)
            }
        }
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.checkpoints.read().await.len() as i64)
    }
}

pub fn test_config() -> Config {
    Config {
        app_env: "test".to_string(),
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "pbmate-test".to_string(),
        web_server_host: "localhost".to_string(),
        web_server_port: 8080,
        jwt_secret: SecretString::from("integration_test_jwt_secret"),
        jwt_expiration_hours: 1,
        openai_api_key: None,
        openai_model: "test-model".to_string(),
        daily_bonus_points: 10,
        leaderboard_size: 10,
    }
}

/// Application state over in-memory repositories, with handles on the
/// stores for direct inspection.
pub struct TestApp {
    pub state: AppState,
    pub problems: Arc<InMemoryProblemRepository>,
    pub submissions: Arc<InMemorySubmissionRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub daily_challenges: Arc<InMemoryDailyChallengeRepository>,
    pub checkpoints: Arc<InMemoryCheckpointRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_parts(Arc::new(InMemoryDailyChallengeRepository::new()), None)
    }

    pub fn with_source(source: Arc<dyn ProblemSource>) -> Self {
        Self::with_parts(Arc::new(InMemoryDailyChallengeRepository::new()), Some(source))
    }

    /// Uses `daily` for the challenge store while keeping the in-memory
    /// handle for inspection.
    pub fn with_daily_repository(daily: Arc<dyn DailyChallengeRepository>) -> Self {
        Self::new().rewired(|repos| repos.daily_challenges = daily)
    }

    /// Rebuilds the services after `customize` swaps repositories, e.g. for
    /// wrappers that inject failures. The in-memory handles stay as they are.
    pub fn rewired(mut self, customize: impl FnOnce(&mut Repositories)) -> Self {
        let daily: Arc<dyn DailyChallengeRepository> = self.daily_challenges.clone();
        let mut repos = self.repositories(daily);
        customize(&mut repos);
        self.state = AppState::build(test_config(), None, repos, None);
        self
    }

    fn with_parts(
        daily_challenges: Arc<InMemoryDailyChallengeRepository>,
        source: Option<Arc<dyn ProblemSource>>,
    ) -> Self {
        let problems = Arc::new(InMemoryProblemRepository::new());
        let submissions = Arc::new(InMemorySubmissionRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let checkpoints = Arc::new(InMemoryCheckpointRepository::new());

        let repos = Repositories {
            problems: problems.clone(),
            submissions: submissions.clone(),
            users: users.clone(),
            profiles: users.clone(),
            progress: users.clone(),
            daily_challenges: daily_challenges.clone(),
            checkpoints: checkpoints.clone(),
        };

        Self {
            state: AppState::build(test_config(), None, repos, source),
            problems,
            submissions,
            users,
            daily_challenges,
            checkpoints,
        }
    }

    fn repositories(&self, daily: Arc<dyn DailyChallengeRepository>) -> Repositories {
        Repositories {
            problems: self.problems.clone(),
            submissions: self.submissions.clone(),
            users: self.users.clone(),
            profiles: self.users.clone(),
            progress: self.users.clone(),
            daily_challenges: daily,
            checkpoints: self.checkpoints.clone(),
        }
    }

    pub async fn add_problem(&self, question: &str, answer: &str, difficulty: Difficulty) -> Problem {
        self.problems
            .create(Problem::new(question, answer, difficulty, Category::Arithmetic))
            .await
            .expect("problem should be stored")
    }

    pub async fn add_checkpoint(&self, number: i32, required: i32, reward: i64) -> MapCheckpoint {
        let checkpoint = MapCheckpoint {
            checkpoint_number: number,
            name: format!("Island {}", number),
            description: format!("Stop number {}", number),
            emoji: "🏝️".to_string(),
            difficulty_level: 1,
            position_x: number * 10,
            position_y: 50,
            problems_to_unlock: required,
            points_reward: reward,
        };
        self.checkpoints
            .upsert(checkpoint.clone())
            .await
            .expect("checkpoint should be stored");
        checkpoint
    }

    pub async fn register(&self, username: &str) -> AuthResponse {
        self.state
            .user_service
            .register(register_request(username))
            .await
            .expect("registration should succeed")
    }

    pub async fn points_of(&self, user_id: &str) -> i64 {
        self.users
            .get(user_id)
            .await
            .expect("user should exist")
            .profile
            .points
    }
}

pub fn register_request(username: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: "Treasure123".to_string(),
        confirm_password: "Treasure123".to_string(),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
