pub mod answer_checker;
pub mod arithmetic_generator;
pub mod daily_challenge_service;
pub mod problem_generator;
pub mod problem_service;
pub mod progress_service;
pub mod seed_service;
pub mod user_service;

use chrono::NaiveDate;

/// The server's local calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
