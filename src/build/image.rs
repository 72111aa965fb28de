// ABOUTME: Drives the runtime's image build and drains its progress stream.
// ABOUTME: An error event aborts the build; output lines go to tracing and the progress sink.

use crate::deploy::Progress;
use crate::runtime::{BuildEvent, BuildOptions, ImageError, ImageOps};
use crate::types::{ImageId, ImageRef};
use bytes::Bytes;
use futures::StreamExt;
use std::collections::HashMap;
use thiserror::Error;

use super::context::DOCKERFILE;

#[derive(Debug, Error)]
pub enum BuildError {
    /// The runtime reported an error event, e.g. a failing `RUN` step.
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Runtime(#[from] ImageError),
}

/// A successfully built image.
#[derive(Debug, Clone)]
pub struct BuiltImage {
    pub tag: ImageRef,
    /// Id reported by the runtime, if it sent one.
    pub image_id: Option<ImageId>,
}

/// Build `tag` from a tar `context` holding the project and its Dockerfile.
///
/// Returns only after the runtime closes the event stream.
pub async fn build_image<R: ImageOps + ?Sized>(
    runtime: &R,
    tag: &ImageRef,
    context: Bytes,
    progress: &dyn Progress,
) -> Result<BuiltImage, BuildError> {
    let options = BuildOptions {
        tag: tag.clone(),
        dockerfile: DOCKERFILE.to_string(),
        build_args: HashMap::from([("NODE_ENV".to_string(), "production".to_string())]),
        remove_intermediate: true,
    };

    tracing::info!(image = %tag, context_size = context.len(), "building image");

    let mut events = runtime.build_image(&options, context);
    let mut image_id = None;

    while let Some(event) = events.next().await {
        match event? {
            BuildEvent::Output(line) | BuildEvent::Status(line) => {
                tracing::debug!(image = %tag, "{}", line);
                progress.build_output(&line);
            }
            BuildEvent::Built { image_id: id } => {
                image_id = Some(ImageId::new(id));
            }
            BuildEvent::Failed { message } => {
                tracing::error!(image = %tag, "build failed: {}", message);
                return Err(BuildError::Failed(message));
            }
        }
    }

    if let Some(id) = &image_id {
        tracing::info!(image = %tag, id = id.short(), "image built");
    }

    Ok(BuiltImage {
        tag: tag.clone(),
        image_id,
    })
}
