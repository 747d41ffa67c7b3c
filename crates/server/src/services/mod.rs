//! External service clients.
//!
//! # Services
//!
//! - `vision` - Cloud Vision label detection for uploaded images

pub mod vision;

pub use vision::{ClassificationError, LabelDetector, VisionClient};
