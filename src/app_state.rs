use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        CheckpointRepository, DailyChallengeRepository, MongoCheckpointRepository,
        MongoDailyChallengeRepository, MongoProblemRepository, MongoProfileRepository,
        MongoProgressRepository, MongoSubmissionRepository, MongoUserRepository,
        ProblemRepository, ProfileRepository, ProgressRepository, SubmissionRepository,
        UserRepository,
    },
    services::{
        daily_challenge_service::DailyChallengeService,
        problem_generator::{OpenAiProblemSource, ProblemGeneratorService, ProblemSource},
        problem_service::ProblemService,
        progress_service::ProgressService,
        seed_service::SeedService,
        user_service::UserService,
    },
};

#[derive(Clone)]
pub struct Repositories {
    pub problems: Arc<dyn ProblemRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub daily_challenges: Arc<dyn DailyChallengeRepository>,
    pub checkpoints: Arc<dyn CheckpointRepository>,
}

impl Repositories {
    /// MongoDB-backed repositories with their indexes in place.
    pub async fn mongo(db: &Database) -> AppResult<Self> {
        let problems = MongoProblemRepository::new(db);
        problems.ensure_indexes().await?;
        let submissions = MongoSubmissionRepository::new(db);
        submissions.ensure_indexes().await?;
        let users = MongoUserRepository::new(db);
        users.ensure_indexes().await?;
        let daily_challenges = MongoDailyChallengeRepository::new(db);
        daily_challenges.ensure_indexes().await?;
        let checkpoints = MongoCheckpointRepository::new(db);
        checkpoints.ensure_indexes().await?;

        Ok(Self {
            problems: Arc::new(problems),
            submissions: Arc::new(submissions),
            users: Arc::new(users),
            profiles: Arc::new(MongoProfileRepository::new(db)),
            progress: Arc::new(MongoProgressRepository::new(db)),
            daily_challenges: Arc::new(daily_challenges),
            checkpoints: Arc::new(checkpoints),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Option<Database>,
    pub jwt: JwtService,
    pub problem_service: Arc<ProblemService>,
    pub daily_challenge_service: Arc<DailyChallengeService>,
    pub progress_service: Arc<ProgressService>,
    pub user_service: Arc<UserService>,
    pub generator_service: Arc<ProblemGeneratorService>,
    pub seed_service: Arc<SeedService>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;
        let repositories = Repositories::mongo(&db).await?;

        let source: Option<Arc<dyn ProblemSource>> = match &config.openai_api_key {
            Some(key) => Some(Arc::new(OpenAiProblemSource::new(key, &config.openai_model))),
            None => {
                log::info!("OPENAI_API_KEY not set; problem generation is disabled");
                None
            }
        };

        Ok(Self::build(config, Some(db), repositories, source))
    }

    /// Wires services over the given repositories.
    pub fn build(
        config: Config,
        db: Option<Database>,
        repos: Repositories,
        source: Option<Arc<dyn ProblemSource>>,
    ) -> Self {
        let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

        let problem_service = Arc::new(ProblemService::new(
            repos.problems.clone(),
            repos.submissions.clone(),
            repos.profiles.clone(),
        ));
        let daily_challenge_service = Arc::new(DailyChallengeService::new(
            repos.daily_challenges.clone(),
            repos.problems.clone(),
            repos.users.clone(),
            repos.profiles.clone(),
            problem_service.clone(),
            config.daily_bonus_points,
        ));
        let progress_service = Arc::new(ProgressService::new(
            repos.checkpoints.clone(),
            repos.progress.clone(),
            problem_service.clone(),
        ));
        let user_service = Arc::new(UserService::new(
            repos.users.clone(),
            repos.profiles.clone(),
            repos.submissions.clone(),
            progress_service.clone(),
            jwt.clone(),
            config.leaderboard_size,
        ));
        let generator_service = Arc::new(ProblemGeneratorService::new(source, repos.problems.clone()));
        let seed_service = Arc::new(SeedService::new(
            repos.problems.clone(),
            repos.checkpoints.clone(),
            daily_challenge_service.clone(),
            generator_service.clone(),
        ));

        Self {
            config: Arc::new(config),
            db,
            jwt,
            problem_service,
            daily_challenge_service,
            progress_service,
            user_service,
            generator_service,
            seed_service,
        }
    }
}
