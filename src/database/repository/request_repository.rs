//! Request repository: append-only movie request log.

use anyhow::Result;
use mongodb::Collection;

use crate::database::Database;
use crate::database::models::MovieRequest;

/// Repository for the movie request audit trail.
pub struct RequestRepository {
    collection: Collection<MovieRequest>,
}

impl RequestRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("requests"),
        }
    }

    /// Append one request entry. Entries are never updated or removed.
    pub async fn record(&self, request: &MovieRequest) -> Result<()> {
        self.collection.insert_one(request).await?;
        Ok(())
    }
}
