// ABOUTME: Image build pipeline for generated projects.
// ABOUTME: Writes build-context files, archives the project tree, and drives the runtime build.

mod archive;
mod context;
mod image;

pub use archive::{ArchiveError, DEFAULT_EXCLUDES, ExcludeSet, build_archive};
pub use context::{DOCKERFILE, DOCKERIGNORE, dockerfile, dockerignore, write_build_context};
pub use image::{BuildError, BuiltImage, build_image};
