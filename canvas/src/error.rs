//! Error type for the fallible edges of the crate: persistence and export.
//!
//! Rendering and hit-testing never fail on native surfaces; the browser
//! surface reports `JsValue` errors directly.

/// Errors from persistence and export.
#[derive(Debug, thiserror::Error)]
pub enum CoverError {
    /// The state could not be serialized.
    #[error("state serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    /// The storage backend refused a read or write.
    #[error("storage failed: {0}")]
    Storage(String),
    /// The canvas could not be encoded as an image.
    #[error("image encoding failed: {0}")]
    Encode(String),
}
