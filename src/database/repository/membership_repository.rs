//! Group membership repository.

use anyhow::Result;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Collection;

use crate::database::models::GroupMember;
use crate::database::Database;

/// Repository for user-group membership links.
pub struct MemberRepo {
    collection: Collection<GroupMember>,
}

impl MemberRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("group_members"),
        }
    }

    /// Idempotent membership creation: `$setOnInsert` only, so repeating the
    /// call leaves an existing link untouched.
    pub async fn ensure(&self, chat_id: i64, user_id: u64, now: i64) -> Result<()> {
        let filter = doc! { "chat_id": chat_id, "user_id": user_id as i64 };
        let update = doc! {
            "$setOnInsert": {
                "chat_id": chat_id,
                "user_id": user_id as i64,
                "joined_at": now,
            },
        };
        self.collection
            .update_one(filter, update)
            .upsert(true)
            .await?;
        Ok(())
    }

    /// Member ids of a group; consumed by the daily aggregation.
    pub async fn member_ids(&self, chat_id: i64) -> Result<Vec<u64>> {
        let cursor = self.collection.find(doc! { "chat_id": chat_id }).await?;
        let members: Vec<GroupMember> = cursor.try_collect().await?;
        Ok(members.into_iter().map(|m| m.user_id).collect())
    }
}

impl Clone for MemberRepo {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
        }
    }
}
