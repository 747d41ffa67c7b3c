//! Wardrobe Core - Shared types library.
//!
//! This crate provides the types shared by the wardrobe components:
//! - `server` - HTTP service that classifies uploaded clothing images
//! - `integration-tests` - Black-box tests against a running server
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for item IDs, user IDs, and wardrobe items
//! - [`inference`] - Label-to-attribute rules for classified images

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod inference;
pub mod types;

pub use inference::{ItemAttributes, infer};
pub use types::*;
