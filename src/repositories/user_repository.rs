use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::{User, UserRole},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the account together with its embedded profile and progress.
    async fn create(&self, user: User) -> AppResult<User>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_all_paginated(&self, offset: i64, limit: i64) -> AppResult<(Vec<User>, i64)>;
    async fn update_account(&self, id: &str, username: &str, email: &str) -> AppResult<User>;
    async fn set_role(&self, id: &str, role: UserRole) -> AppResult<()>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn count(&self) -> AppResult<i64>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::USERS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for users collection");

        for (field, name) in [("id", "id_unique"), ("username", "username_unique"), ("email", "email_unique")] {
            let model = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(name.to_string())
                        .build(),
                )
                .build();
            self.collection.create_index(model).await?;
        }

        let points_index = IndexModel::builder()
            .keys(doc! { "profile.points": -1, "username": 1 })
            .options(
                IndexOptions::builder()
                    .name("leaderboard".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(points_index).await?;

        log::info!("Successfully created indexes for users collection");
        Ok(())
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("User with id '{}' not found", id))
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        self.collection.insert_one(&user).await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "id": id }).await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "username": username })
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "email": email.to_lowercase() })
            .await?;
        Ok(user)
    }

    async fn find_all_paginated(&self, offset: i64, limit: i64) -> AppResult<(Vec<User>, i64)> {
        let total = self.collection.count_documents(doc! {}).await? as i64;

        let users: Vec<User> = self
            .collection
            .find(doc! {})
            .sort(doc! { "username": 1 })
            .skip(offset.max(0) as u64)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((users, total))
    }

    async fn update_account(&self, id: &str, username: &str, email: &str) -> AppResult<User> {
        let result = self
            .collection
            .update_one(
                doc! { "id": id },
                doc! { "$set": { "username": username, "email": email.to_lowercase() } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(not_found(id));
        }

        self.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    async fn set_role(&self, id: &str, role: UserRole) -> AppResult<()> {
        let role = mongodb::bson::to_bson(&role)?;
        let result = self
            .collection
            .update_one(doc! { "id": id }, doc! { "$set": { "role": role } })
            .await?;

        if result.matched_count == 0 {
            return Err(not_found(id));
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(not_found(id));
        }

        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.collection.count_documents(doc! {}).await? as i64)
    }
}
