//! Filter repository with keyword-list and record caching.
//!
//! Keeps two caches in front of the `filters` collection: the per-chat
//! keyword list (L1, consulted on every group message) and full records
//! keyed by `(chat_id, keyword)` (L2). Writes invalidate both.

use anyhow::Result;
use futures::StreamExt;
use mongodb::Collection;
use mongodb::bson::{Document, doc};
use tracing::debug;

use crate::cache::{CacheConfig, TypedCache};
use crate::database::Database;
use crate::database::models::FilterRecord;

/// Repository for scenepack filters.
pub struct FilterRepository {
    collection: Collection<FilterRecord>,
    /// L1: chat id -> keywords, ascending
    keywords_cache: TypedCache<i64, Vec<String>>,
    /// L2: (chat id, keyword) -> record
    record_cache: TypedCache<(i64, String), FilterRecord>,
}

impl FilterRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("filters"),
            keywords_cache: TypedCache::new(CacheConfig::keyword_lists()),
            record_cache: TypedCache::new(CacheConfig::records()),
        }
    }

    /// All keywords of a chat in ascending order.
    ///
    /// The matcher scans this list on every group message, so it is cached;
    /// the ordering also makes equal-score lookups deterministic.
    pub async fn keywords(&self, chat_id: i64) -> Result<Vec<String>> {
        if let Some(keywords) = self.keywords_cache.get(&chat_id) {
            return Ok(keywords);
        }

        let raw: Collection<Document> = self.collection.clone_with_type();
        let options = mongodb::options::FindOptions::builder()
            .projection(doc! { "keyword": 1, "_id": 0 })
            .sort(doc! { "keyword": 1 })
            .build();

        let mut cursor = raw
            .find(doc! { "chat_id": chat_id })
            .with_options(options)
            .await?;
        let mut keywords = Vec::new();

        while let Some(result) = cursor.next().await {
            if let Ok(doc) = result {
                if let Ok(keyword) = doc.get_str("keyword") {
                    keywords.push(keyword.to_string());
                }
            }
        }

        debug!("Loaded {} keywords for chat {}", keywords.len(), chat_id);
        self.keywords_cache.insert(chat_id, keywords.clone());
        Ok(keywords)
    }

    /// Fetch a single record by keyword.
    pub async fn get(&self, chat_id: i64, keyword: &str) -> Result<Option<FilterRecord>> {
        let key = (chat_id, keyword.to_lowercase());

        if let Some(record) = self.record_cache.get(&key) {
            return Ok(Some(record));
        }

        let filter = doc! { "chat_id": chat_id, "keyword": &key.1 };
        let result = self.collection.find_one(filter).await?;

        if let Some(record) = &result {
            self.record_cache.insert(key, record.clone());
        }

        Ok(result)
    }

    /// All records of a chat sorted by keyword. Used for listings, export
    /// and the paginated browser; not cached.
    pub async fn all(&self, chat_id: i64) -> Result<Vec<FilterRecord>> {
        let options = mongodb::options::FindOptions::builder()
            .sort(doc! { "keyword": 1 })
            .build();

        let mut cursor = self
            .collection
            .find(doc! { "chat_id": chat_id })
            .with_options(options)
            .await?;
        let mut records = Vec::new();

        while let Some(result) = cursor.next().await {
            records.push(result?);
        }

        Ok(records)
    }

    /// Insert or replace a filter, keyed by `(chat_id, keyword)`.
    pub async fn upsert(&self, record: &FilterRecord) -> Result<()> {
        let filter = doc! { "chat_id": record.chat_id, "keyword": &record.keyword };
        let options = mongodb::options::ReplaceOptions::builder()
            .upsert(true)
            .build();

        self.collection
            .replace_one(filter, record)
            .with_options(options)
            .await?;

        self.record_cache
            .insert((record.chat_id, record.keyword.clone()), record.clone());
        self.keywords_cache.invalidate(&record.chat_id);

        Ok(())
    }

    /// Delete one filter. Returns whether anything was removed.
    pub async fn delete(&self, chat_id: i64, keyword: &str) -> Result<bool> {
        let keyword = keyword.to_lowercase();
        let result = self
            .collection
            .delete_one(doc! { "chat_id": chat_id, "keyword": &keyword })
            .await?;

        if result.deleted_count > 0 {
            self.record_cache.invalidate(&(chat_id, keyword));
            self.keywords_cache.invalidate(&chat_id);
            return Ok(true);
        }

        Ok(false)
    }

    /// Delete every filter of a chat. Returns the removed count.
    pub async fn delete_all(&self, chat_id: i64) -> Result<u64> {
        // Drop cached records before the list itself goes away.
        if let Ok(keywords) = self.keywords(chat_id).await {
            for keyword in keywords {
                self.record_cache.invalidate(&(chat_id, keyword));
            }
        }

        let result = self
            .collection
            .delete_many(doc! { "chat_id": chat_id })
            .await?;
        self.keywords_cache.invalidate(&chat_id);

        Ok(result.deleted_count)
    }

    /// Number of filters stored across all chats.
    pub async fn count_all(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    /// Chat ids that have at least one filter.
    pub async fn distinct_chats(&self) -> Result<Vec<i64>> {
        let values = self.collection.distinct("chat_id", doc! {}).await?;
        Ok(values.iter().filter_map(|v| v.as_i64()).collect())
    }
}
