pub mod checkpoint_repository;
pub mod daily_challenge_repository;
pub mod problem_repository;
pub mod profile_repository;
pub mod progress_repository;
pub mod submission_repository;
pub mod user_repository;

pub use checkpoint_repository::{CheckpointRepository, MongoCheckpointRepository};
pub use daily_challenge_repository::{DailyChallengeRepository, MongoDailyChallengeRepository};
pub use problem_repository::{MongoProblemRepository, ProblemFilter, ProblemRepository};
pub use profile_repository::{MongoProfileRepository, ProfileRepository};
pub use progress_repository::{MongoProgressRepository, ProgressRepository};
pub use submission_repository::{MongoSubmissionRepository, SubmissionRepository, SubmissionStats};
pub use user_repository::{MongoUserRepository, UserRepository};
