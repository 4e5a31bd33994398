//! Movie request log entries (stored in the `requests` collection).

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// An append-only record of a movie a member asked for.
///
/// Written both by the explicit `/request` command and whenever a group
/// lookup finds no acceptable match. Never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRequest {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// What the member asked for, as typed
    pub movie_name: String,

    /// Telegram user id of the requester
    pub requester_id: i64,

    /// Chat the request came from
    pub chat_id: i64,

    /// Unix timestamp (seconds) of the request
    pub requested_at: i64,
}

impl MovieRequest {
    /// Create a request stamped with the current time.
    pub fn new(movie_name: impl Into<String>, requester_id: i64, chat_id: i64) -> Self {
        Self {
            id: None,
            movie_name: movie_name.into(),
            requester_id,
            chat_id,
            requested_at: chrono::Utc::now().timestamp(),
        }
    }
}
