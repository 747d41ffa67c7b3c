//! Application state shared across handlers.

use std::sync::Arc;

use url::Url;

use crate::db::ItemStore;
use crate::services::LabelDetector;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// item store, the label detector, and request-independent settings.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    items: Arc<dyn ItemStore>,
    labels: Arc<dyn LabelDetector>,
    placeholder_image_base: Url,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `items` - Wardrobe item storage
    /// * `labels` - Image label detector
    /// * `placeholder_image_base` - Base URL for synthesized image URLs
    #[must_use]
    pub fn new(
        items: Arc<dyn ItemStore>,
        labels: Arc<dyn LabelDetector>,
        placeholder_image_base: Url,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                items,
                labels,
                placeholder_image_base,
            }),
        }
    }

    /// Get the wardrobe item store.
    #[must_use]
    pub fn items(&self) -> &dyn ItemStore {
        self.inner.items.as_ref()
    }

    /// Get the image label detector.
    #[must_use]
    pub fn labels(&self) -> &dyn LabelDetector {
        self.inner.labels.as_ref()
    }

    /// Get the base URL for placeholder images.
    #[must_use]
    pub fn placeholder_image_base(&self) -> &Url {
        &self.inner.placeholder_image_base
    }
}
