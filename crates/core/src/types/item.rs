//! Wardrobe item types.
//!
//! Items are create-only: there is no update or delete path anywhere in the
//! service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ItemId, UserId};

/// A wardrobe item as stored, including storage-assigned fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardrobeItem {
    /// Identity assigned on insert.
    pub id: ItemId,
    /// Owner of the item.
    pub user_id: UserId,
    /// Detected clothing type, `"clothing"`, or `"unknown"`.
    pub item_type: String,
    /// Detected color or `"unknown"`.
    pub color: String,
    /// Placeholder image URL.
    pub image_url: String,
    /// Raw classifier labels in classifier order.
    pub tags: Vec<String>,
    /// When the item was stored.
    pub created_at: DateTime<Utc>,
}

/// A wardrobe item that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWardrobeItem {
    pub user_id: UserId,
    pub item_type: String,
    pub color: String,
    pub image_url: String,
    pub tags: Vec<String>,
}

impl NewWardrobeItem {
    /// Attach the storage-assigned fields, producing the persisted form.
    #[must_use]
    pub fn into_stored(self, id: ItemId, created_at: DateTime<Utc>) -> WardrobeItem {
        WardrobeItem {
            id,
            user_id: self.user_id,
            item_type: self.item_type,
            color: self.color,
            image_url: self.image_url,
            tags: self.tags,
            created_at,
        }
    }
}
