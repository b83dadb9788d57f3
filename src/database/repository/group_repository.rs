//! Group repository.
//!
//! Short TTL on the cache: streak reads serve the record-check command, and
//! every streak mutation happens in-process (the aggregator), which
//! invalidates on write.

use std::time::Duration;

use anyhow::{anyhow, Result};
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson};
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use tracing::debug;

use crate::cache::{CacheConfig, TypedCache};
use crate::database::models::WakeGroup;
use crate::database::Database;

/// Repository for group streak records.
pub struct GroupRepo {
    collection: Collection<WakeGroup>,
    cache: TypedCache<i64, WakeGroup>,
}

impl GroupRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("groups"),
            cache: TypedCache::new(
                "groups_by_chat",
                CacheConfig::with_capacity(5_000).ttl(Duration::from_secs(60)),
            ),
        }
    }

    /// Idempotent group creation; refreshes the cached title.
    pub async fn ensure(&self, chat_id: i64, title: Option<&str>) -> Result<WakeGroup> {
        if let Some(cached) = self.cache.get(&chat_id) {
            if cached.title.as_deref() == title {
                return Ok(cached);
            }
        }

        let filter = doc! { "chat_id": chat_id };
        let update = doc! {
            "$set": { "title": title.map(Bson::from).unwrap_or(Bson::Null) },
            "$setOnInsert": { "current_streak": 0i64, "best_streak": 0i64 },
        };
        let stored = self
            .collection
            .find_one_and_update(filter, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| anyhow!("upsert for group {} returned no document", chat_id))?;

        self.cache.insert(chat_id, stored.clone());
        Ok(stored)
    }

    pub async fn get(&self, chat_id: i64) -> Result<Option<WakeGroup>> {
        if let Some(group) = self.cache.get(&chat_id) {
            return Ok(Some(group));
        }

        let result = self.collection.find_one(doc! { "chat_id": chat_id }).await?;
        if let Some(group) = &result {
            self.cache.insert(chat_id, group.clone());
        }
        Ok(result)
    }

    /// All known groups; aggregator input.
    pub async fn list_all(&self) -> Result<Vec<WakeGroup>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Persist an advanced streak after a fully successful day.
    pub async fn record_success(&self, chat_id: i64, streak: i64, best: i64) -> Result<()> {
        self.collection
            .update_one(
                doc! { "chat_id": chat_id },
                doc! { "$set": { "current_streak": streak, "best_streak": best } },
            )
            .await?;
        self.cache.invalidate(&chat_id);
        debug!("Group {} streak advanced to {}", chat_id, streak);
        Ok(())
    }

    /// Reset the streak after a failed day.
    pub async fn reset_streak(&self, chat_id: i64) -> Result<()> {
        self.collection
            .update_one(
                doc! { "chat_id": chat_id },
                doc! { "$set": { "current_streak": 0i64 } },
            )
            .await?;
        self.cache.invalidate(&chat_id);
        debug!("Group {} streak reset", chat_id);
        Ok(())
    }
}

impl Clone for GroupRepo {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            cache: self.cache.clone(),
        }
    }
}
