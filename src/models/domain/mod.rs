pub mod checkpoint;
pub mod daily_challenge;
pub mod problem;
pub mod profile;
pub mod progress;
pub mod submission;
pub mod user;
pub use checkpoint::{CheckpointStatus, MapCheckpoint};
pub use daily_challenge::DailyChallenge;
pub use problem::{Category, Difficulty, Problem};
pub use profile::UserProfile;
pub use progress::UserProgress;
pub use submission::{Submission, SubmissionSource};
pub use user::{User, UserRole};
