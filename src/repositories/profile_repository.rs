use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson},
    Collection,
};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::User,
};

/// Point and streak writes against the profile embedded in each user.
///
/// Every write is a single-document update so concurrent requests for the
/// same user cannot lose each other's changes.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn award_points(&self, user_id: &str, amount: i64) -> AppResult<()>;
    /// Records a daily-challenge completion in one write: the new streak,
    /// `today` as the last completion date and `bonus` added to the points.
    /// Applies only if the stored last completion date is still
    /// `previous_date`; returns `false` when another write got there first.
    async fn record_daily_completion(
        &self,
        user_id: &str,
        previous_date: Option<NaiveDate>,
        today: NaiveDate,
        streak: i64,
        bonus: i64,
    ) -> AppResult<bool>;
    async fn leaderboard(&self, limit: i64) -> AppResult<Vec<User>>;
    /// 1-based rank for a user holding `points`.
    async fn rank_of(&self, points: i64) -> AppResult<i64>;
}

pub struct MongoProfileRepository {
    collection: Collection<User>,
}

impl MongoProfileRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::USERS);
        Self { collection }
    }
}

fn date_bson(date: Option<NaiveDate>) -> Bson {
    match date {
        Some(date) => Bson::String(date.to_string()),
        None => Bson::Null,
    }
}

#[async_trait]
impl ProfileRepository for MongoProfileRepository {
    async fn award_points(&self, user_id: &str, amount: i64) -> AppResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "id": user_id },
                doc! { "$inc": { "profile.points": amount } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "User with id '{}' not found",
                user_id
            )));
        }

        log::debug!("Awarded {} points to user {}", amount, user_id);
        Ok(())
    }

    async fn record_daily_completion(
        &self,
        user_id: &str,
        previous_date: Option<NaiveDate>,
        today: NaiveDate,
        streak: i64,
        bonus: i64,
    ) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! {
                    "id": user_id,
                    "profile.last_daily_challenge_date": date_bson(previous_date),
                },
                doc! {
                    "$set": {
                        "profile.last_daily_challenge_date": date_bson(Some(today)),
                        "profile.current_streak": streak,
                    },
                    "$inc": { "profile.points": bonus },
                },
            )
            .await?;

        Ok(result.modified_count == 1)
    }

    async fn leaderboard(&self, limit: i64) -> AppResult<Vec<User>> {
        let users = self
            .collection
            .find(doc! {})
            .sort(doc! { "profile.points": -1, "username": 1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }

    async fn rank_of(&self, points: i64) -> AppResult<i64> {
        let ahead = self
            .collection
            .count_documents(doc! { "profile.points": { "$gt": points } })
            .await?;
        Ok(ahead as i64 + 1)
    }
}
