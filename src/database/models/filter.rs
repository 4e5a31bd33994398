//! Scenepack filter documents (stored in the `filters` collection).

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::database::InlineButton;

/// What kind of reply a filter produces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Plain text reply
    #[default]
    Text,
    /// Photo with the stored text as caption
    Photo,
}

/// One stored scenepack entry, unique per `(chat_id, keyword)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRecord {
    /// MongoDB document ID. Never included in backups.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Group this filter belongs to
    pub chat_id: i64,

    /// Lookup keyword, always stored lowercase
    pub keyword: String,

    /// Reply kind (text or photo)
    #[serde(default)]
    pub kind: FilterKind,

    /// Reply body, button markup already stripped out at save time
    #[serde(default)]
    pub body_text: String,

    /// Telegram file id of the photo, for [`FilterKind::Photo`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_ref: Option<String>,

    /// Button rows attached below the reply
    #[serde(default)]
    pub buttons: Vec<Vec<InlineButton>>,
}

impl FilterRecord {
    /// Create a photo filter for a chat.
    pub fn photo(
        chat_id: i64,
        keyword: impl Into<String>,
        body_text: impl Into<String>,
        file_id: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            chat_id,
            keyword: keyword.into().to_lowercase(),
            kind: FilterKind::Photo,
            body_text: body_text.into(),
            media_ref: Some(file_id.into()),
            buttons: Vec::new(),
        }
    }

    /// Strip the storage id, e.g. before exporting or copying to another chat.
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }
}
