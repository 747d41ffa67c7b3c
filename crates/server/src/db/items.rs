//! Wardrobe item repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use wardrobe_core::{ItemId, NewWardrobeItem, UserId, WardrobeItem};

use super::{ItemStore, RepositoryError};

/// Row shape of `wardrobe_items`.
#[derive(Debug, FromRow)]
struct ItemRow {
    id: i64,
    user_id: String,
    item_type: String,
    color: String,
    image_url: String,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for WardrobeItem {
    type Error = RepositoryError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let user_id = UserId::parse(&row.user_id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid user_id in item {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ItemId::new(row.id),
            user_id,
            item_type: row.item_type,
            color: row.color,
            image_url: row.image_url,
            tags: row.tags,
            created_at: row.created_at,
        })
    }
}

/// `PostgreSQL`-backed [`ItemStore`].
///
/// Holds a clone of the process-wide pool; cloning a `PgPool` shares the
/// same connections.
#[derive(Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for ItemRepository {
    async fn create(&self, item: NewWardrobeItem) -> Result<WardrobeItem, RepositoryError> {
        let row: ItemRow = sqlx::query_as(
            r"
            INSERT INTO wardrobe_items (user_id, item_type, color, image_url, tags)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, item_type, color, image_url, tags, created_at
            ",
        )
        .bind(&item.user_id)
        .bind(&item.item_type)
        .bind(&item.color)
        .bind(&item.image_url)
        .bind(&item.tags)
        .fetch_one(&self.pool)
        .await?;

        WardrobeItem::try_from(row)
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<WardrobeItem>, RepositoryError> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            r"
            SELECT id, user_id, item_type, color, image_url, tags, created_at
            FROM wardrobe_items
            WHERE user_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(WardrobeItem::try_from).collect()
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(user_id: &str) -> ItemRow {
        ItemRow {
            id: 9,
            user_id: user_id.to_string(),
            item_type: "dress".to_string(),
            color: "red".to_string(),
            image_url: "https://placehold.co/300x400?text=dress".to_string(),
            tags: vec!["dress".to_string(), "red".to_string()],
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_row_maps_to_item() {
        let item = WardrobeItem::try_from(row("u1")).unwrap();
        assert_eq!(item.id, ItemId::new(9));
        assert_eq!(item.user_id.as_str(), "u1");
        assert_eq!(item.tags, vec!["dress", "red"]);
    }

    #[test]
    fn test_row_with_empty_user_is_corruption() {
        let err = WardrobeItem::try_from(row("")).unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }
}
