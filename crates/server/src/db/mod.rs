//! Database operations for the wardrobe `PostgreSQL` store.
//!
//! # Tables
//!
//! - `wardrobe_items` - One row per classified upload (create and read only)
//!
//! The table is created on startup if it does not exist, the same way a
//! document store creates a collection on first insert.

pub mod items;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use wardrobe_core::{NewWardrobeItem, UserId, WardrobeItem};

pub use items::ItemRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Storage for wardrobe items.
///
/// Implemented by [`ItemRepository`] for `PostgreSQL`; handlers only see this
/// trait.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert a new item, returning it with its assigned ID and timestamp.
    async fn create(&self, item: NewWardrobeItem) -> Result<WardrobeItem, RepositoryError>;

    /// All items owned by `user_id`, in insertion order.
    ///
    /// Returns an empty list when the user has no items.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<WardrobeItem>, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

const CREATE_ITEMS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS wardrobe_items (
    id         BIGSERIAL PRIMARY KEY,
    user_id    TEXT NOT NULL,
    item_type  TEXT NOT NULL,
    color      TEXT NOT NULL,
    image_url  TEXT NOT NULL,
    tags       TEXT[] NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

const CREATE_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS wardrobe_items_user_id_idx ON wardrobe_items (user_id)";

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Create the `wardrobe_items` table and its index if they are missing.
///
/// # Errors
///
/// Returns `sqlx::Error` if either statement fails.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_ITEMS_TABLE).execute(pool).await?;
    sqlx::query(CREATE_USER_INDEX).execute(pool).await?;
    Ok(())
}
