//! Cloud Vision label detection client.
//!
//! Sends the raw image bytes to the `images:annotate` endpoint with a single
//! `LABEL_DETECTION` feature and returns the label descriptions, lowercased,
//! in the order the service ranked them.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::VisionConfig;

/// Path of the batch annotate endpoint, relative to the API base URL.
const ANNOTATE_PATH: &str = "v1/images:annotate";

/// Errors that can occur when classifying an image.
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// HTTP request failed (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Produces text labels for an image.
#[async_trait]
pub trait LabelDetector: Send + Sync {
    /// Detect labels in `image`.
    ///
    /// Labels are lowercase and in the order returned by the detector.
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<String>, ClassificationError>;
}

/// Cloud Vision API client.
#[derive(Clone)]
pub struct VisionClient {
    client: reqwest::Client,
    annotate_url: Url,
    api_key: SecretString,
    max_results: u32,
}

impl VisionClient {
    /// Create a new Vision API client.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint cannot be joined or the HTTP client
    /// fails to build.
    pub fn new(config: &VisionConfig) -> Result<Self, ClassificationError> {
        let annotate_url = endpoint_with_trailing_slash(&config.endpoint)
            .join(ANNOTATE_PATH)
            .map_err(|e| ClassificationError::Malformed(format!("invalid endpoint: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            annotate_url,
            api_key: config.api_key.clone(),
            max_results: config.max_results,
        })
    }

    fn request_url(&self) -> Url {
        let mut url = self.annotate_url.clone();
        url.query_pairs_mut()
            .append_pair("key", self.api_key.expose_secret());
        url
    }
}

#[async_trait]
impl LabelDetector for VisionClient {
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<String>, ClassificationError> {
        let body = AnnotateRequest::label_detection(image, self.max_results);

        let response = self
            .client
            .post(self.request_url())
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClassificationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await.map_err(reqwest::Error::without_url)?;
        let labels = parse_labels(&text)?;

        tracing::info!(labels = ?labels, "Detected labels");
        Ok(labels)
    }
}

/// Ensure `join` appends to the configured path instead of replacing its last
/// segment.
fn endpoint_with_trailing_slash(endpoint: &Url) -> Url {
    let mut url = endpoint.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Extract lowercase label descriptions from an `images:annotate` response body.
fn parse_labels(body: &str) -> Result<Vec<String>, ClassificationError> {
    let parsed: AnnotateResponse =
        serde_json::from_str(body).map_err(|e| ClassificationError::Malformed(e.to_string()))?;

    let image = parsed
        .responses
        .into_iter()
        .next()
        .ok_or_else(|| ClassificationError::Malformed("empty responses array".to_string()))?;

    if let Some(error) = image.error {
        return Err(ClassificationError::Api {
            status: error.code.unwrap_or_default(),
            message: error.message.unwrap_or_default(),
        });
    }

    Ok(image
        .label_annotations
        .into_iter()
        .map(|label| label.description.to_lowercase())
        .collect())
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

impl AnnotateRequest {
    fn label_detection(image: &[u8], max_results: u32) -> Self {
        Self {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(image),
                },
                features: vec![Feature {
                    feature_type: "LABEL_DETECTION",
                    max_results,
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    feature_type: &'static str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    /// Omitted by the API when nothing was detected.
    #[serde(default)]
    label_annotations: Vec<EntityAnnotation>,
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    code: Option<u16>,
    message: Option<String>,
}
