// ABOUTME: Composable capability traits for container runtimes.
// ABOUTME: Defines ImageOps, ContainerOps, LogOps, and RuntimeInfo.

mod container;
mod image;
mod logs;
mod runtime_info;
pub(crate) mod sealed;
mod shared_types;

pub use container::{ContainerError, ContainerOps};
pub use image::{BuildEventStream, ImageError, ImageOps};
pub use logs::{LogError, LogLine, LogLineStream, LogOps, LogSource};
pub use runtime_info::{RuntimeInfo, RuntimeInfoError, RuntimeMetadata};
pub use shared_types::*;
