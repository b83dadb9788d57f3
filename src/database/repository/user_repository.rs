//! User repository.
//!
//! Every state transition with a precondition is written as a single
//! conditional update: the filter restates the precondition, so two
//! near-simultaneous commands cannot both pass a check-then-act race. A
//! `None` return from the `try_*` methods means the precondition no longer
//! held at write time.

use std::time::Duration;

use anyhow::{anyhow, Result};
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson};
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use teloxide::types::User;
use tracing::debug;

use crate::cache::{CacheConfig, TypedCache};
use crate::database::models::{WakeUser, WEEKLY_JOKER_LIMIT};
use crate::database::Database;

/// Repository for per-member wake-up state.
pub struct UserRepo {
    collection: Collection<WakeUser>,
    // Identity cache only: used to skip redundant upserts, never for
    // report/joker decisions (those always read fresh or go through a
    // conditional write).
    cache: TypedCache<u64, WakeUser>,
}

impl UserRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
            cache: TypedCache::new(
                "users_by_id",
                CacheConfig::with_capacity(10_000).ttl(Duration::from_secs(3600)),
            ),
        }
    }

    /// Upsert-on-miss for a user seen in an interaction; refreshes the
    /// display name on every call.
    pub async fn ensure(&self, user: &User, week_start: &str, now: i64) -> Result<WakeUser> {
        let user_id = user.id.0;
        let display_name = user.full_name();
        let username = user.username.as_ref().map(|u| u.to_lowercase());

        // Skip the write if identity is unchanged
        if let Some(cached) = self.cache.get(&user_id) {
            if cached.display_name == display_name && cached.username == username {
                return Ok(cached);
            }
        }

        let filter = doc! { "user_id": user_id as i64 };
        let update = doc! {
            "$set": {
                "display_name": &display_name,
                "username": username.as_deref().map(Bson::from).unwrap_or(Bson::Null),
                "updated_at": now,
            },
            "$setOnInsert": {
                "wakeup_hour": Bson::Null,
                "wakeup_minute": Bson::Null,
                "last_report": Bson::Null,
                "last_report_day": Bson::Null,
                "today_reported": false,
                "joker_used": false,
                "last_joker": Bson::Null,
                "week_joker_count": 0i64,
                "week_start_date": week_start,
            },
        };

        let stored = self
            .collection
            .find_one_and_update(filter, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| anyhow!("upsert for user {} returned no document", user_id))?;

        debug!("Ensured user {} ({})", user_id, stored.display_name);
        self.cache.insert(user_id, stored.clone());
        Ok(stored)
    }

    /// Fresh state read, bypassing the identity cache.
    pub async fn get(&self, user_id: u64) -> Result<Option<WakeUser>> {
        let filter = doc! { "user_id": user_id as i64 };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Load a batch of members by id.
    pub async fn get_many(&self, ids: &[u64]) -> Result<Vec<WakeUser>> {
        let ids: Vec<i64> = ids.iter().map(|id| *id as i64).collect();
        let cursor = self
            .collection
            .find(doc! { "user_id": { "$in": ids } })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Advance the week window if it is stale, zeroing the joker allowance.
    /// The filter makes this fire exactly once per boundary crossing no
    /// matter how many interactions race over it.
    pub async fn apply_week_rollover(&self, user_id: u64, week_start: &str) -> Result<bool> {
        let filter = doc! {
            "user_id": user_id as i64,
            "week_start_date": { "$ne": week_start },
        };
        let update = doc! {
            "$set": { "week_start_date": week_start, "week_joker_count": 0i64 },
        };
        let result = self.collection.update_one(filter, update).await?;
        if result.modified_count > 0 {
            debug!("Week rollover applied for user {} -> {}", user_id, week_start);
            self.cache.invalidate(&user_id);
        }
        Ok(result.modified_count > 0)
    }

    /// Persist a validated wake-up time.
    pub async fn set_wakeup_time(&self, user_id: u64, hour: u8, minute: u8, now: i64) -> Result<()> {
        let filter = doc! { "user_id": user_id as i64 };
        let update = doc! {
            "$set": {
                "wakeup_hour": hour as i32,
                "wakeup_minute": minute as i32,
                "updated_at": now,
            },
        };
        self.collection.update_one(filter, update).await?;
        self.cache.invalidate(&user_id);
        Ok(())
    }

    /// Record a wake report, conditioned on not having reported today.
    /// Returns `None` when another report for the same day already won.
    pub async fn try_record_report(
        &self,
        user_id: u64,
        now: i64,
        day_key: &str,
    ) -> Result<Option<WakeUser>> {
        let filter = doc! {
            "user_id": user_id as i64,
            "$or": [
                { "today_reported": false },
                { "last_report_day": { "$ne": day_key } },
            ],
        };
        let update = doc! {
            "$set": {
                "last_report": now,
                "last_report_day": day_key,
                "today_reported": true,
                "updated_at": now,
            },
        };
        let updated = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;
        self.cache.invalidate(&user_id);
        Ok(updated)
    }

    /// Spend the weekly good-sleep pass, conditioned on the allowance.
    /// Returns `None` when the weekly limit was already reached.
    pub async fn try_declare_joker(&self, user_id: u64, now: i64) -> Result<Option<WakeUser>> {
        let filter = doc! {
            "user_id": user_id as i64,
            "week_joker_count": { "$lt": WEEKLY_JOKER_LIMIT },
        };
        let update = doc! {
            "$set": { "joker_used": true, "last_joker": now, "updated_at": now },
            "$inc": { "week_joker_count": 1i64 },
        };
        let updated = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;
        self.cache.invalidate(&user_id);
        Ok(updated)
    }

    /// Take back a good-sleep declaration, conditioned on one being active.
    /// The pipeline computes [`WakeUser::week_count_after_cancel`] on the
    /// stored document, so the decrement stays atomic and clamped at zero
    /// even when a week rollover lands between declare and cancel.
    pub async fn try_cancel_joker(&self, user_id: u64, now: i64) -> Result<Option<WakeUser>> {
        let filter = doc! {
            "user_id": user_id as i64,
            "joker_used": true,
        };
        let update = vec![doc! {
            "$set": {
                "joker_used": false,
                "week_joker_count": {
                    "$max": [0, { "$subtract": ["$week_joker_count", 1] }],
                },
                "updated_at": now,
            },
        }];
        let updated = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;
        self.cache.invalidate(&user_id);
        Ok(updated)
    }

    /// Nightly reset of the daily flags for a set of members.
    pub async fn reset_daily_flags(&self, ids: &[u64]) -> Result<()> {
        let bson_ids: Vec<i64> = ids.iter().map(|id| *id as i64).collect();
        self.collection
            .update_many(
                doc! { "user_id": { "$in": bson_ids } },
                doc! { "$set": { "today_reported": false, "joker_used": false } },
            )
            .await?;
        for id in ids {
            self.cache.invalidate(id);
        }
        Ok(())
    }
}

impl Clone for UserRepo {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            cache: self.cache.clone(),
        }
    }
}
