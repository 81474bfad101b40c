//! Batch problem generation through a chat-completion model.
//!
//! The model is asked for one problem per line in the form
//! `question|answer|difficulty|category`. Every line is validated on its own;
//! bad lines are logged and dropped without failing the batch.

use std::{collections::HashSet, sync::Arc};

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};

use crate::{
    constants::prompts::{problem_generator_prompt, PROBLEM_GENERATOR_SYSTEM_PROMPT},
    errors::{AppError, AppResult},
    models::{
        domain::{Category, Difficulty, Problem},
        dto::response::GenerationReport,
    },
    repositories::ProblemRepository,
};

/// Something that can produce raw generator output.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProblemSource: Send + Sync {
    async fn fetch(&self, count: u32, difficulty: Difficulty, category: Category) -> AppResult<String>;
}

pub struct OpenAiProblemSource {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiProblemSource {
    pub fn new(api_key: &SecretString, model: &str) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.expose_secret());
        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl ProblemSource for OpenAiProblemSource {
    async fn fetch(&self, count: u32, difficulty: Difficulty, category: Category) -> AppResult<String> {
        let prompt = problem_generator_prompt(count, difficulty.as_str(), category.as_str());
        log::info!(
            "Requesting {} {} {} problems from model {}",
            count,
            difficulty,
            category,
            self.model
        );

        let response: Value = self
            .client
            .chat()
            .create_byot(json!({
                "model": self.model,
                "messages": [
                    { "role": "system", "content": PROBLEM_GENERATOR_SYSTEM_PROMPT },
                    { "role": "user", "content": prompt },
                ],
                "temperature": 0.7,
            }))
            .await?;

        response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::ExternalService("Generator response had no message content".to_string())
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedLine {
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub category: Category,
}

pub fn parse_line(line: &str) -> Result<GeneratedLine, String> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    let [question, answer, difficulty, category] = fields.as_slice() else {
        return Err(format!("expected 4 fields, found {}", fields.len()));
    };

    if question.is_empty() {
        return Err("empty question".to_string());
    }
    if answer.is_empty() {
        return Err("empty answer".to_string());
    }

    Ok(GeneratedLine {
        question: question.to_string(),
        answer: answer.to_string(),
        difficulty: difficulty.parse()?,
        category: category.parse()?,
    })
}

pub struct ProblemGeneratorService {
    source: Option<Arc<dyn ProblemSource>>,
    problems: Arc<dyn ProblemRepository>,
}

impl ProblemGeneratorService {
    pub fn new(source: Option<Arc<dyn ProblemSource>>, problems: Arc<dyn ProblemRepository>) -> Self {
        Self { source, problems }
    }

    pub fn is_enabled(&self) -> bool {
        self.source.is_some()
    }

    pub async fn generate(
        &self,
        count: u32,
        difficulty: Difficulty,
        category: Category,
    ) -> AppResult<GenerationReport> {
        let source = self.source.as_ref().ok_or_else(|| {
            AppError::BadRequest("Problem generation is not configured".to_string())
        })?;

        let output = source.fetch(count, difficulty, category).await?;
        let mut report = GenerationReport {
            requested: i64::from(count),
            ..GenerationReport::default()
        };
        let mut seen = HashSet::new();

        for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let parsed = match parse_line(line) {
                Ok(parsed) => parsed,
                Err(reason) => {
                    log::warn!("Discarding generated line {:?}: {}", line, reason);
                    report.lines_discarded += 1;
                    continue;
                }
            };

            if !seen.insert(parsed.question.to_lowercase())
                || self.problems.exists_by_question(&parsed.question).await?
            {
                log::debug!("Skipping duplicate question {:?}", parsed.question);
                report.duplicates_skipped += 1;
                continue;
            }

            let problem = Problem::new(
                &parsed.question,
                &parsed.answer,
                parsed.difficulty,
                parsed.category,
            );
            match self.problems.create(problem).await {
                Ok(_) => report.created += 1,
                Err(AppError::AlreadyExists(_)) => report.duplicates_skipped += 1,
                Err(e) => {
                    log::error!("Failed to store generated problem {:?}: {}", parsed.question, e);
                    report.lines_discarded += 1;
                }
            }
        }

        log::info!(
            "Generated problems: {} created, {} duplicates, {} discarded",
            report.created,
            report.duplicates_skipped,
            report.lines_discarded
        );
        Ok(report)
    }
}
