use async_trait::async_trait;
use mongodb::{bson::doc, Collection};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::{User, UserProgress},
};

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn find_progress(&self, user_id: &str) -> AppResult<Option<UserProgress>>;
    /// Stores `progress` and adds `reward` to the user's points in the same
    /// write, if the stored version still equals `expected_version`. The
    /// version is bumped by one. Returns `false` when the document moved on
    /// in the meantime.
    async fn save_progress(
        &self,
        user_id: &str,
        progress: &UserProgress,
        expected_version: i64,
        reward: i64,
    ) -> AppResult<bool>;
}

pub struct MongoProgressRepository {
    collection: Collection<User>,
}

impl MongoProgressRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::USERS);
        Self { collection }
    }
}

#[async_trait]
impl ProgressRepository for MongoProgressRepository {
    async fn find_progress(&self, user_id: &str) -> AppResult<Option<UserProgress>> {
        let user = self.collection.find_one(doc! { "id": user_id }).await?;
        Ok(user.map(|u| u.progress))
    }

    async fn save_progress(
        &self,
        user_id: &str,
        progress: &UserProgress,
        expected_version: i64,
        reward: i64,
    ) -> AppResult<bool> {
        let mut next = progress.clone();
        next.version = expected_version + 1;
        let next = mongodb::bson::to_bson(&next)?;

        let result = self
            .collection
            .update_one(
                doc! { "id": user_id, "progress.version": expected_version },
                doc! {
                    "$set": { "progress": next },
                    "$inc": { "profile.points": reward },
                },
            )
            .await?;

        Ok(result.modified_count == 1)
    }
}
