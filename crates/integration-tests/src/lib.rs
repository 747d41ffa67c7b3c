//! Integration tests for the wardrobe service.
//!
//! These tests talk to a running server over HTTP and are `#[ignore]`d by
//! default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server against a scratch database with a real Vision key
//! cargo run -p wardrobe-server
//!
//! # Run integration tests
//! WARDROBE_BASE_URL=http://localhost:5000 cargo test -p wardrobe-integration-tests -- --ignored
//! ```
//!
//! `WARDROBE_SAMPLE_IMAGE` may point at a clothing photo; without it a tiny
//! embedded PNG is uploaded, which Vision classifies as something generic.

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use wardrobe_core::WardrobeItem;

/// A 1x1 white PNG.
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53,
    0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0xF8, 0xFF, 0xFF, 0x3F,
    0x00, 0x05, 0xFE, 0x02, 0xFE, 0x0D, 0xEF, 0x46, 0xB8, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E,
    0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Body of a successful upload.
#[derive(Debug, Deserialize)]
pub struct UploadBody {
    pub success: bool,
    pub message: String,
    pub data: WardrobeItem,
}

/// Body of a successful list.
#[derive(Debug, Deserialize)]
pub struct ListBody {
    pub success: bool,
    pub count: usize,
    pub data: Vec<WardrobeItem>,
}

/// Body of any error response.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

/// HTTP client bound to a running wardrobe server.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Build a context from `WARDROBE_BASE_URL` (default `http://localhost:5000`).
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("WARDROBE_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Image bytes to upload: `WARDROBE_SAMPLE_IMAGE` if set, else [`TINY_PNG`].
    #[must_use]
    pub fn sample_image() -> Vec<u8> {
        std::env::var("WARDROBE_SAMPLE_IMAGE")
            .ok()
            .and_then(|path| std::fs::read(path).ok())
            .unwrap_or_else(|| TINY_PNG.to_vec())
    }

    /// A user id no other test run will collide with.
    #[must_use]
    pub fn unique_user_id() -> String {
        format!("it-{}", uuid::Uuid::new_v4())
    }

    /// POST `/api/wardrobe/upload` with the given optional parts.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the request could not be sent.
    pub async fn upload(
        &self,
        image: Option<Vec<u8>>,
        user_id: Option<&str>,
    ) -> Result<Response, reqwest::Error> {
        let mut form = Form::new();
        if let Some(bytes) = image {
            form = form.part("image", Part::bytes(bytes).file_name("item.png"));
        }
        if let Some(user_id) = user_id {
            form = form.text("userId", user_id.to_string());
        }

        self.client
            .post(format!("{}/api/wardrobe/upload", self.base_url))
            .multipart(form)
            .send()
            .await
    }

    /// GET `/api/wardrobe`, with `?userId=` when given.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the request could not be sent.
    pub async fn list(&self, user_id: Option<&str>) -> Result<Response, reqwest::Error> {
        let mut request = self.client.get(format!("{}/api/wardrobe", self.base_url));
        if let Some(user_id) = user_id {
            request = request.query(&[("userId", user_id)]);
        }
        request.send().await
    }
}
