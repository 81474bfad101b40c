use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::DailyChallenge,
};

#[async_trait]
pub trait DailyChallengeRepository: Send + Sync {
    async fn find_by_date(&self, date: NaiveDate) -> AppResult<Option<DailyChallenge>>;
    /// Fails with `AlreadyExists` when a challenge for that date is present.
    async fn create(&self, challenge: DailyChallenge) -> AppResult<DailyChallenge>;
    /// Records `user_id` as a completer. Returns `false` if it already was one.
    async fn mark_completed(&self, date: NaiveDate, user_id: &str) -> AppResult<bool>;
    async fn list_recent(&self, limit: i64) -> AppResult<Vec<DailyChallenge>>;
}

pub struct MongoDailyChallengeRepository {
    collection: Collection<DailyChallenge>,
}

impl MongoDailyChallengeRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::DAILY_CHALLENGES);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for daily_challenges collection");

        let date_index = IndexModel::builder()
            .keys(doc! { "date": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("date_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(date_index).await?;

        log::info!("Successfully created indexes for daily_challenges collection");
        Ok(())
    }
}

#[async_trait]
impl DailyChallengeRepository for MongoDailyChallengeRepository {
    async fn find_by_date(&self, date: NaiveDate) -> AppResult<Option<DailyChallenge>> {
        let challenge = self
            .collection
            .find_one(doc! { "date": date.to_string() })
            .await?;
        Ok(challenge)
    }

    async fn create(&self, challenge: DailyChallenge) -> AppResult<DailyChallenge> {
        self.collection.insert_one(&challenge).await?;
        Ok(challenge)
    }

    async fn mark_completed(&self, date: NaiveDate, user_id: &str) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "date": date.to_string(), "completed_by": { "$ne": user_id } },
                doc! { "$addToSet": { "completed_by": user_id } },
            )
            .await?;
        Ok(result.modified_count == 1)
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<DailyChallenge>> {
        let challenges = self
            .collection
            .find(doc! {})
            .sort(doc! { "date": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(challenges)
    }
}
