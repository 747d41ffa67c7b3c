//! Wardrobe route handlers.
//!
//! JSON API for creating wardrobe items from uploaded images and listing a
//! user's items.

use axum::{
    Json,
    extract::{
        Multipart, Query, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::QueryRejection,
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{Span, field, instrument};
use url::Url;
use wardrobe_core::{NewWardrobeItem, UserId, WardrobeItem, infer};

use crate::error::{Result, ValidationError};
use crate::state::AppState;

/// Multipart field carrying the image bytes.
pub const IMAGE_FIELD: &str = "image";

/// Multipart field / query parameter carrying the owner id.
pub const USER_ID_FIELD: &str = "userId";

const UPLOAD_SUCCESS_MESSAGE: &str = "Item added to wardrobe successfully!";

/// Response from a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: WardrobeItem,
}

/// Response from listing a user's items.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<WardrobeItem>,
}

/// Query parameters for listing items.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Upload an image, classify it, and store a new wardrobe item.
///
/// POST /api/wardrobe/upload
///
/// Expects `multipart/form-data` with an `image` file and a `userId` field.
/// Both are validated before the classifier is called.
///
/// # Errors
///
/// Returns 400 if the image or `userId` is missing, 500 if classification or
/// persistence fails.
#[instrument(skip_all, fields(user_id = field::Empty, image_bytes = field::Empty))]
pub async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    // A request that is not multipart at all carries no file.
    let multipart = multipart.map_err(|_| ValidationError::MissingFile)?;
    let form = UploadForm::read(multipart).await?;

    let image = form
        .image
        .filter(|bytes| !bytes.is_empty())
        .ok_or(ValidationError::MissingFile)?;
    let user_id = form
        .user_id
        .and_then(|raw| UserId::parse(&raw).ok())
        .ok_or(ValidationError::MissingUserId)?;

    let span = Span::current();
    span.record("user_id", user_id.as_str());
    span.record("image_bytes", image.len());

    let labels = state.labels().detect_labels(&image).await?;
    let attributes = infer(labels);
    let image_url = placeholder_image_url(state.placeholder_image_base(), &attributes.item_type);

    let item = state
        .items()
        .create(NewWardrobeItem {
            user_id,
            item_type: attributes.item_type,
            color: attributes.color,
            image_url,
            tags: attributes.tags,
        })
        .await?;

    tracing::info!(
        item_id = %item.id,
        item_type = %item.item_type,
        color = %item.color,
        "Wardrobe item created"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            message: UPLOAD_SUCCESS_MESSAGE,
            data: item,
        }),
    ))
}

/// List all wardrobe items for a user.
///
/// GET /api/wardrobe?userId=...
///
/// # Errors
///
/// Returns 400 if `userId` is missing, 500 if the query fails.
#[instrument(skip_all, fields(user_id = field::Empty))]
pub async fn list(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse>> {
    // An unparseable query string (e.g. a repeated `userId`) names no user.
    let Query(query) = query.map_err(|_| ValidationError::MissingUserId)?;
    let user_id = query
        .user_id
        .and_then(|raw| UserId::parse(&raw).ok())
        .ok_or(ValidationError::MissingUserId)?;
    Span::current().record("user_id", user_id.as_str());

    let items = state.items().list_by_user(&user_id).await?;

    Ok(Json(ListResponse {
        success: true,
        count: items.len(),
        data: items,
    }))
}

/// Build the placeholder image URL for an item type.
///
/// The item type goes in the `text` query parameter, form-urlencoded.
#[must_use]
pub fn placeholder_image_url(base: &Url, item_type: &str) -> String {
    let mut url = base.clone();
    url.query_pairs_mut().append_pair("text", item_type);
    url.into()
}

/// Fields collected from the upload form.
#[derive(Debug, Default)]
struct UploadForm {
    image: Option<axum::body::Bytes>,
    user_id: Option<String>,
}

impl UploadForm {
    /// Read the fields this handler cares about, ignoring the rest.
    ///
    /// If a field appears more than once the last value wins.
    async fn read(mut multipart: Multipart) -> std::result::Result<Self, ValidationError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            match field.name() {
                Some(IMAGE_FIELD) => {
                    form.image = Some(field.bytes().await.map_err(multipart_error)?);
                }
                Some(USER_ID_FIELD) => {
                    form.user_id = Some(field.text().await.map_err(multipart_error)?);
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

fn multipart_error(err: MultipartError) -> ValidationError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::PayloadTooLarge
    } else {
        ValidationError::InvalidMultipart(err.body_text())
    }
}
