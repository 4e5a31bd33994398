//! Connection repository: which groups each admin manages.

use anyhow::Result;
use mongodb::Collection;
use mongodb::bson::doc;

use crate::database::Database;
use crate::database::models::{GroupConnection, KnownGroup};

/// Repository for per-admin group connections.
pub struct ConnectionRepository {
    collection: Collection<GroupConnection>,
}

impl ConnectionRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("connections"),
        }
    }

    /// The admin's connection document, if they connected anything yet.
    pub async fn get(&self, admin_id: i64) -> Result<Option<GroupConnection>> {
        Ok(self
            .collection
            .find_one(doc! { "admin_id": admin_id })
            .await?)
    }

    /// The admin's active group id, if one is set.
    pub async fn active_group(&self, admin_id: i64) -> Result<Option<i64>> {
        Ok(self.get(admin_id).await?.and_then(|c| c.active_group))
    }

    /// Remember a group for this admin and make it the active one.
    pub async fn connect(&self, admin_id: i64, group: &KnownGroup) -> Result<()> {
        // Drop any stale entry for this id first; the title may have changed
        // since the last connect.
        self.collection
            .update_one(
                doc! { "admin_id": admin_id },
                doc! { "$pull": { "groups": { "id": group.id } } },
            )
            .await?;

        let update = doc! {
            "$set": { "active_group": group.id },
            "$addToSet": { "groups": { "id": group.id, "name": &group.name } },
        };
        let options = mongodb::options::UpdateOptions::builder()
            .upsert(true)
            .build();

        self.collection
            .update_one(doc! { "admin_id": admin_id }, update)
            .with_options(options)
            .await?;

        Ok(())
    }

    /// Point management commands at an already-known group.
    pub async fn set_active(&self, admin_id: i64, group_id: i64) -> Result<()> {
        self.collection
            .update_one(
                doc! { "admin_id": admin_id },
                doc! { "$set": { "active_group": group_id } },
            )
            .await?;

        Ok(())
    }

    /// Forget a group. Clears the active pointer when it referenced the
    /// removed group, and drops the document once no groups remain.
    pub async fn disconnect(&self, admin_id: i64, group_id: i64) -> Result<()> {
        self.collection
            .update_one(
                doc! { "admin_id": admin_id },
                doc! { "$pull": { "groups": { "id": group_id } } },
            )
            .await?;

        self.collection
            .update_one(
                doc! { "admin_id": admin_id, "active_group": group_id },
                doc! { "$unset": { "active_group": "" } },
            )
            .await?;

        self.collection
            .delete_one(doc! { "admin_id": admin_id, "groups": { "$size": 0 } })
            .await?;

        Ok(())
    }
}
