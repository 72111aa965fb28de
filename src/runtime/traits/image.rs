// ABOUTME: Image operations trait for container runtimes.
// ABOUTME: Build from a tar context, check existence, and remove images.

use super::sealed::Sealed;
use super::shared_types::{BuildEvent, BuildOptions};
use crate::types::ImageRef;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// Lazily produced build progress. Ends when the runtime closes the stream.
pub type BuildEventStream<'a> =
    Pin<Box<dyn Stream<Item = Result<BuildEvent, ImageError>> + Send + 'a>>;

/// Image operations: build, check existence, remove.
#[async_trait]
pub trait ImageOps: Sealed + Send + Sync {
    /// Submit a build. `context` is an uncompressed tar of the build context
    /// with the build descriptor at its root.
    ///
    /// Nothing happens until the returned stream is polled.
    fn build_image(&self, options: &BuildOptions, context: Bytes) -> BuildEventStream<'_>;

    /// Check if an image exists locally.
    async fn image_exists(&self, reference: &ImageRef) -> Result<bool, ImageError>;

    /// Remove an image.
    async fn remove_image(&self, reference: &ImageRef, force: bool) -> Result<(), ImageError>;
}

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image not found: {0}")]
    NotFound(String),

    #[error("image in use, cannot remove: {0}")]
    InUse(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
