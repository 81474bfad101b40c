#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{Category, Difficulty, MapCheckpoint, Problem, User};

    /// Creates a standard test user
    pub fn test_user() -> User {
        User::test_user("testuser")
    }

    pub fn test_admin() -> User {
        let mut user = User::test_user("admiral");
        user.role = crate::models::domain::UserRole::Admin;
        user
    }

    pub fn test_problem(question: &str, answer: &str, difficulty: Difficulty) -> Problem {
        Problem::new(question, answer, difficulty, Category::Arithmetic)
    }

    /// One problem per difficulty.
    pub fn test_problems() -> Vec<Problem> {
        vec![
            test_problem("2 + 3", "5", Difficulty::Easy),
            test_problem("12 x 4", "48", Difficulty::Medium),
            test_problem("144 / 12 + 7 x 3", "33", Difficulty::Hard),
        ]
    }

    /// A small three-stop map: 3, 4 and 5 solves for 10, 15 and 20 points.
    pub fn test_map() -> Vec<MapCheckpoint> {
        vec![
            MapCheckpoint::test_checkpoint(1, 3, 10),
            MapCheckpoint::test_checkpoint(2, 4, 15),
            MapCheckpoint::test_checkpoint(3, 5, 20),
        ]
    }
}

/// In-memory stand-ins for the MongoDB repositories.
#[cfg(test)]
pub mod in_memory {
    use std::{collections::HashMap, sync::Arc};

    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use crate::{
        errors::{AppError, AppResult},
        models::domain::Problem,
        repositories::{ProblemFilter, ProblemRepository},
    };

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
            let page = items
                .into_iter()
                .skip(offset.max(0) as usize)
                .take(limit.max(0) as usize)
                .collect();
            Ok((page, total))
        }

        async fn sample_excluding(&self, filter: ProblemFilter, exclude: &[String]) -> AppResult<Option<Problem>> {
            let problems = self.problems.read().await;
            Ok(problems
                .values()
                .find(|p| filter.matches(p) && !exclude.contains(&p.id))
                .cloned())
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
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{fixtures::*, in_memory::InMemoryProblemRepository};
    use crate::{
        errors::AppError,
        models::domain::Difficulty,
        repositories::{ProblemFilter, ProblemRepository},
    };

    #[test]
    fn test_fixtures_test_user() {
        let user = test_user();
        assert_eq!(user.username, "testuser");
        assert_eq!(user.email, "testuser@example.com");
        assert!(test_admin().is_admin());
    }

    #[test]
    fn test_fixtures_cover_every_difficulty() {
        let problems = test_problems();
        for difficulty in Difficulty::ALL {
            assert!(problems.iter().any(|p| p.difficulty == difficulty));
        }
        assert_eq!(test_map().len(), 3);
    }

    #[tokio::test]
    async fn in_memory_problem_repository_rejects_duplicate_questions() {
        let repo = InMemoryProblemRepository::new();
        repo.create(test_problem("2 + 3", "5", Difficulty::Easy))
            .await
            .expect("first insert should work");

        let duplicate = repo.create(test_problem("2 + 3", "5", Difficulty::Medium)).await;
        assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));
        assert_eq!(repo.count(ProblemFilter::default()).await.expect("count"), 1);
    }
}
