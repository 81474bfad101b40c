use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Difficulty, Problem, Submission, SubmissionSource},
        dto::{
            request::{PageQuery, ProblemRequest},
            response::{CheckAnswerResult, GeneratedProblemDto, ProblemDto, ProblemPage, SubmissionPage},
        },
    },
    repositories::{ProblemFilter, ProblemRepository, ProfileRepository, SubmissionRepository},
    services::{answer_checker, arithmetic_generator},
};

/// Outcome of checking and logging one answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoredAttempt {
    pub correct: bool,
    pub correct_answer: String,
    /// Difficulty points granted; non-zero only on a user's first correct
    /// solve of the problem.
    pub points_awarded: i64,
}

pub struct ProblemService {
    problems: Arc<dyn ProblemRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl ProblemService {
    pub fn new(
        problems: Arc<dyn ProblemRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            problems,
            submissions,
            profiles,
        }
    }

    pub async fn get_problem(&self, id: &str) -> AppResult<Problem> {
        self.problems
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Problem with id '{}' not found", id)))
    }

    pub async fn list_problems(&self, filter: ProblemFilter, page: &PageQuery) -> AppResult<ProblemPage> {
        let (offset, limit) = page.bounds();
        let (items, total) = self.problems.list(filter, offset, limit).await?;

        Ok(ProblemPage {
            items: items.into_iter().map(ProblemDto::from).collect(),
            total,
            offset,
            limit,
        })
    }

    pub async fn random_problem(&self, filter: ProblemFilter) -> AppResult<Problem> {
        self.problems
            .sample(filter)
            .await?
            .ok_or_else(|| AppError::NotFound("No problems match the requested filter".to_string()))
    }

    /// A random problem matching `filter` whose id is not in `exclude`.
    pub async fn sample_problem(&self, filter: ProblemFilter, exclude: &[String]) -> AppResult<Option<Problem>> {
        self.problems.sample_excluding(filter, exclude).await
    }

    pub fn practice_problem(&self, difficulty: Difficulty) -> GeneratedProblemDto {
        arithmetic_generator::generate(difficulty)
    }

    pub async fn log_submission(
        &self,
        problem_id: &str,
        answer: &str,
        user_id: &str,
        was_correct: bool,
        source: SubmissionSource,
    ) -> AppResult<Submission> {
        self.submissions
            .create(Submission::record(user_id, problem_id, answer, was_correct, source))
            .await
    }

    /// Checks `answer`, appends it to the submission log and awards the
    /// problem's points on the user's first correct solve.
    pub async fn score_attempt(
        &self,
        problem: &Problem,
        answer: &str,
        user_id: &str,
        source: SubmissionSource,
    ) -> AppResult<ScoredAttempt> {
        let check = answer_checker::check(answer, &problem.answer);
        self.log_submission(&problem.id, answer, user_id, check.is_correct, source)
            .await?;

        let mut points_awarded = 0;
        if check.is_correct && self.problems.mark_solved(&problem.id, user_id).await? {
            points_awarded = problem.difficulty.points();
            if let Err(e) = self.profiles.award_points(user_id, points_awarded).await {
                // Release the first solve so a retry can still earn the points.
                self.problems.unmark_solved(&problem.id, user_id).await?;
                return Err(e);
            }
        }

        Ok(ScoredAttempt {
            correct: check.is_correct,
            correct_answer: check.correct_answer,
            points_awarded,
        })
    }

    pub async fn check_answer(&self, problem_id: &str, answer: &str, user_id: &str) -> AppResult<CheckAnswerResult> {
        let problem = self.get_problem(problem_id).await?;
        let attempt = self
            .score_attempt(&problem, answer, user_id, SubmissionSource::Practice)
            .await?;

        let result = if !attempt.correct {
            CheckAnswerResult {
                correct: false,
                message: format!("Not quite. The correct answer is {}.", attempt.correct_answer),
                correct_answer: Some(attempt.correct_answer),
                points_awarded: 0,
            }
        } else if attempt.points_awarded > 0 {
            CheckAnswerResult {
                correct: true,
                message: format!("Correct! You earned {} points.", attempt.points_awarded),
                correct_answer: None,
                points_awarded: attempt.points_awarded,
            }
        } else {
            CheckAnswerResult {
                correct: true,
                message: "Correct! You already earned points for this problem.".to_string(),
                correct_answer: None,
                points_awarded: 0,
            }
        };

        Ok(result)
    }

    pub async fn submission_history(&self, user_id: &str, page: &PageQuery) -> AppResult<SubmissionPage> {
        let (offset, limit) = page.bounds();
        let (items, total) = self.submissions.list_by_user(user_id, offset, limit).await?;

        Ok(SubmissionPage {
            items,
            total,
            offset,
            limit,
        })
    }

    pub async fn admin_list_problems(&self, filter: ProblemFilter, page: &PageQuery) -> AppResult<(Vec<Problem>, i64)> {
        let (offset, limit) = page.bounds();
        self.problems.list(filter, offset, limit).await
    }

    pub async fn create_problem(&self, request: ProblemRequest) -> AppResult<Problem> {
        request.validate()?;

        if self.problems.exists_by_question(&request.question).await? {
            return Err(AppError::AlreadyExists(format!(
                "A problem with question '{}' already exists",
                request.question.trim()
            )));
        }

        let problem = Problem::new(
            &request.question,
            &request.answer,
            request.difficulty,
            request.category,
        );
        let problem = self.problems.create(problem).await?;
        log::info!("Created problem {} ({})", problem.id, problem.difficulty);
        Ok(problem)
    }

    pub async fn update_problem(&self, id: &str, request: ProblemRequest) -> AppResult<Problem> {
        request.validate()?;

        let mut problem = self.get_problem(id).await?;
        let question = request.question.trim();
        if !problem.question.eq_ignore_ascii_case(question)
            && self.problems.exists_by_question(question).await?
        {
            return Err(AppError::AlreadyExists(format!(
                "A problem with question '{}' already exists",
                question
            )));
        }

        problem.question = question.to_string();
        problem.answer = request.answer.trim().to_string();
        problem.difficulty = request.difficulty;
        problem.category = request.category;

        let problem = self.problems.update(problem).await?;
        log::info!("Updated problem {}", problem.id);
        Ok(problem)
    }

    pub async fn delete_problem(&self, id: &str) -> AppResult<()> {
        self.problems.delete(id).await?;
        log::info!("Deleted problem {}", id);
        Ok(())
    }
}
