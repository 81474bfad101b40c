use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::Submission,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubmissionStats {
    pub total: i64,
    pub correct: i64,
}

/// Append-only: there is no update or delete.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn create(&self, submission: Submission) -> AppResult<Submission>;
    async fn list_by_user(&self, user_id: &str, offset: i64, limit: i64) -> AppResult<(Vec<Submission>, i64)>;
    async fn stats_for_user(&self, user_id: &str) -> AppResult<SubmissionStats>;
}

pub struct MongoSubmissionRepository {
    collection: Collection<Submission>,
}

impl MongoSubmissionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::SUBMISSIONS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for submissions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_time_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "submitted_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_submitted_at".to_string())
                    .build(),
            )
            .build();

        let problem_index = IndexModel::builder()
            .keys(doc! { "problem_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("problem_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_time_index).await?;
        self.collection.create_index(problem_index).await?;

        log::info!("Successfully created indexes for submissions collection");
        Ok(())
    }
}

#[async_trait]
impl SubmissionRepository for MongoSubmissionRepository {
    async fn create(&self, submission: Submission) -> AppResult<Submission> {
        self.collection.insert_one(&submission).await?;
        Ok(submission)
    }

    async fn list_by_user(&self, user_id: &str, offset: i64, limit: i64) -> AppResult<(Vec<Submission>, i64)> {
        let filter = doc! { "user_id": user_id };
        let total = self.collection.count_documents(filter.clone()).await?;

        let submissions = self
            .collection
            .find(filter)
            .sort(doc! { "submitted_at": -1 })
            .skip(offset.max(0) as u64)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((submissions, total as i64))
    }

    async fn stats_for_user(&self, user_id: &str) -> AppResult<SubmissionStats> {
        let total = self
            .collection
            .count_documents(doc! { "user_id": user_id })
            .await?;
        let correct = self
            .collection
            .count_documents(doc! { "user_id": user_id, "was_correct": true })
            .await?;

        Ok(SubmissionStats {
            total: total as i64,
            correct: correct as i64,
        })
    }
}
