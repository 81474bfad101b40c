use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::MapCheckpoint,
};

#[async_trait]
pub trait CheckpointRepository: Send + Sync {
    /// All checkpoints ordered by number.
    async fn list_all(&self) -> AppResult<Vec<MapCheckpoint>>;
    async fn find_by_number(&self, number: i32) -> AppResult<Option<MapCheckpoint>>;
    /// Inserts or replaces the checkpoint with the same number. Returns `true`
    /// when a new checkpoint was inserted.
    async fn upsert(&self, checkpoint: MapCheckpoint) -> AppResult<bool>;
    async fn count(&self) -> AppResult<i64>;
}

pub struct MongoCheckpointRepository {
    collection: Collection<MapCheckpoint>,
}

impl MongoCheckpointRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::MAP_CHECKPOINTS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for map_checkpoints collection");

        let number_index = IndexModel::builder()
            .keys(doc! { "checkpoint_number": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("checkpoint_number_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(number_index).await?;

        log::info!("Successfully created indexes for map_checkpoints collection");
        Ok(())
    }
}

#[async_trait]
impl CheckpointRepository for MongoCheckpointRepository {
    async fn list_all(&self) -> AppResult<Vec<MapCheckpoint>> {
        let checkpoints = self
            .collection
            .find(doc! {})
            .sort(doc! { "checkpoint_number": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(checkpoints)
    }

    async fn find_by_number(&self, number: i32) -> AppResult<Option<MapCheckpoint>> {
        let checkpoint = self
            .collection
            .find_one(doc! { "checkpoint_number": number })
            .await?;
        Ok(checkpoint)
    }

    async fn upsert(&self, checkpoint: MapCheckpoint) -> AppResult<bool> {
        let result = self
            .collection
            .replace_one(
                doc! { "checkpoint_number": checkpoint.checkpoint_number },
                &checkpoint,
            )
            .upsert(true)
            .await?;
        Ok(result.upserted_id.is_some())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.collection.count_documents(doc! {}).await? as i64)
    }
}
