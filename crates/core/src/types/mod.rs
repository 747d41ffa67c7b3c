//! Core types for the wardrobe service.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod item;
pub mod user_id;

pub use id::ItemId;
pub use item::{NewWardrobeItem, WardrobeItem};
pub use user_id::{UserId, UserIdError};
