//! Admin-to-group connection documents (stored in the `connections` collection).

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A group the admin has connected to at least once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownGroup {
    /// Telegram chat id of the group
    pub id: i64,
    /// Group title at the time of connection
    pub name: String,
}

/// One document per admin: which groups they know and which one is active.
///
/// All private-chat management commands operate on `active_group`. The
/// document is created on the first `/connect` and removed once the admin
/// disconnects from their last group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConnection {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Telegram user id of the admin
    pub admin_id: i64,

    /// Group currently targeted by management commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_group: Option<i64>,

    /// Every group this admin has connected, newest last
    #[serde(default)]
    pub groups: Vec<KnownGroup>,
}

impl GroupConnection {
    /// Look up the stored title of a known group.
    pub fn group_name(&self, group_id: i64) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.id == group_id)
            .map(|g| g.name.as_str())
    }
}
