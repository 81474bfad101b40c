use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{Collation, CollationStrength, IndexOptions},
    Collection, IndexModel,
};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::{Category, Difficulty, Problem},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProblemFilter {
    pub difficulty: Option<Difficulty>,
    pub category: Option<Category>,
}

impl ProblemFilter {
    pub fn matches(&self, problem: &Problem) -> bool {
        self.difficulty.map_or(true, |d| problem.difficulty == d)
            && self.category.map_or(true, |c| problem.category == c)
    }

    fn to_document(self) -> Document {
        let mut filter = doc! {};
        if let Some(difficulty) = self.difficulty {
            filter.insert("difficulty", difficulty.as_str());
        }
        if let Some(category) = self.category {
            filter.insert("category", category.as_str());
        }
        filter
    }
}

#[async_trait]
pub trait ProblemRepository: Send + Sync {
    async fn create(&self, problem: Problem) -> AppResult<Problem>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Problem>>;
    /// Case-insensitive match on the question text.
    async fn exists_by_question(&self, question: &str) -> AppResult<bool>;
    async fn list(&self, filter: ProblemFilter, offset: i64, limit: i64) -> AppResult<(Vec<Problem>, i64)>;
    /// One problem chosen uniformly at random among those matching `filter`.
    async fn sample(&self, filter: ProblemFilter) -> AppResult<Option<Problem>> {
        self.sample_excluding(filter, &[]).await
    }
    /// Like [`ProblemRepository::sample`], skipping the ids in `exclude`.
    async fn sample_excluding(&self, filter: ProblemFilter, exclude: &[String]) -> AppResult<Option<Problem>>;
    /// Replaces the editable fields; `solved_by` is left alone.
    async fn update(&self, problem: Problem) -> AppResult<Problem>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    /// Adds `user_id` to the solvers. Returns `false` if it was already there.
    async fn mark_solved(&self, problem_id: &str, user_id: &str) -> AppResult<bool>;
    /// Undoes [`ProblemRepository::mark_solved`].
    async fn unmark_solved(&self, problem_id: &str, user_id: &str) -> AppResult<()>;
    async fn count(&self, filter: ProblemFilter) -> AppResult<i64>;
}

pub struct MongoProblemRepository {
    collection: Collection<Problem>,
}

impl MongoProblemRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::PROBLEMS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for problems collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // Questions are unique regardless of case.
        let question_index = IndexModel::builder()
            .keys(doc! { "question": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("question_unique_ci".to_string())
                    .collation(
                        Collation::builder()
                            .locale("en".to_string())
                            .strength(CollationStrength::Secondary)
                            .build(),
                    )
                    .build(),
            )
            .build();

        let difficulty_category_index = IndexModel::builder()
            .keys(doc! { "difficulty": 1, "category": 1 })
            .options(
                IndexOptions::builder()
                    .name("difficulty_category".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(question_index).await?;
        self.collection.create_index(difficulty_category_index).await?;

        log::info!("Successfully created indexes for problems collection");
        Ok(())
    }
}

#[async_trait]
impl ProblemRepository for MongoProblemRepository {
    async fn create(&self, problem: Problem) -> AppResult<Problem> {
        self.collection.insert_one(&problem).await?;
        Ok(problem)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Problem>> {
        let problem = self.collection.find_one(doc! { "id": id }).await?;
        Ok(problem)
    }

    async fn exists_by_question(&self, question: &str) -> AppResult<bool> {
        let pattern = format!("^{}$", regex::escape(question.trim()));
        let count = self
            .collection
            .count_documents(doc! { "question": { "$regex": pattern, "$options": "i" } })
            .await?;
        Ok(count > 0)
    }

    async fn list(&self, filter: ProblemFilter, offset: i64, limit: i64) -> AppResult<(Vec<Problem>, i64)> {
        let filter = filter.to_document();
        let total = self.collection.count_documents(filter.clone()).await? as i64;

        let items: Vec<Problem> = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(offset.max(0) as u64)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((items, total))
    }

    async fn sample_excluding(&self, filter: ProblemFilter, exclude: &[String]) -> AppResult<Option<Problem>> {
        let mut matching = filter.to_document();
        if !exclude.is_empty() {
            matching.insert("id", doc! { "$nin": exclude.to_vec() });
        }
        let pipeline = vec![
            doc! { "$match": matching },
            doc! { "$sample": { "size": 1 } },
        ];

        let mut cursor = self.collection.aggregate(pipeline).await?;
        match cursor.try_next().await? {
            Some(document) => Ok(Some(mongodb::bson::from_document(document)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, problem: Problem) -> AppResult<Problem> {
        let result = self
            .collection
            .update_one(
                doc! { "id": &problem.id },
                doc! {
                    "$set": {
                        "question": &problem.question,
                        "answer": &problem.answer,
                        "difficulty": problem.difficulty.as_str(),
                        "category": problem.category.as_str(),
                    }
                },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Problem with id '{}' not found",
                problem.id
            )));
        }

        Ok(problem)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Problem with id '{}' not found", id)));
        }

        Ok(())
    }

    async fn mark_solved(&self, problem_id: &str, user_id: &str) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "id": problem_id, "solved_by": { "$ne": user_id } },
                doc! { "$addToSet": { "solved_by": user_id } },
            )
            .await?;
        Ok(result.modified_count == 1)
    }

    async fn unmark_solved(&self, problem_id: &str, user_id: &str) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "id": problem_id },
                doc! { "$pull": { "solved_by": user_id } },
            )
            .await?;
        Ok(())
    }

    async fn count(&self, filter: ProblemFilter) -> AppResult<i64> {
        let count = self.collection.count_documents(filter.to_document()).await?;
        Ok(count as i64)
    }
}
