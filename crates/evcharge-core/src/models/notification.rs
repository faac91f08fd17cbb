//! Notifications delivered over the realtime hub or fetched over REST.

use serde::{Deserialize, Serialize};

/// Aliases: `id` | `_id` | `notificationId`, `kind` | `type`,
/// `isRead` | `read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(alias = "_id", alias = "notificationId")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(alias = "body")]
    pub message: String,
    #[serde(default, alias = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, alias = "read")]
    pub is_read: bool,
}
