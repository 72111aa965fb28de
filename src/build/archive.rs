// ABOUTME: Serializes a project directory into an uncompressed tar build context.
// ABOUTME: Excluded names are skipped wherever they appear in the tree.

use bytes::Bytes;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task::spawn_blocking;
use tracing::debug;

/// Names never sent to the runtime: dependency cache, version control,
/// previous build output, local secrets. A single `*` matches any run of
/// characters within one path component.
pub const DEFAULT_EXCLUDES: &[&str] = &["node_modules", ".git", ".next", ".env*.local"];

#[derive(Debug, Error)]
#[error("failed to archive {}: {source}", .path.display())]
pub struct ArchiveError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Path names to leave out of an archive.
///
/// A path is excluded when any of its components matches one of the names,
/// so `node_modules` also drops `packages/ui/node_modules`.
#[derive(Debug, Clone)]
pub struct ExcludeSet {
    names: Vec<String>,
}

impl ExcludeSet {
    /// The default exclusions plus `extra`.
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
        for name in extra {
            let name = name.into();
            let name = name.trim_matches('/').to_string();
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        Self { names }
    }

    pub fn is_excluded(&self, relative: &Path) -> bool {
        relative.components().any(|c| {
            let c = c.as_os_str().to_string_lossy();
            self.names.iter().any(|n| component_matches(n, &c))
        }) || self
            .names
            .iter()
            .any(|n| n.contains('/') && relative == Path::new(n))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

fn component_matches(pattern: &str, component: &str) -> bool {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            component.len() >= prefix.len() + suffix.len()
                && component.starts_with(prefix)
                && component.ends_with(suffix)
        }
        None => pattern == component,
    }
}

impl Default for ExcludeSet {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

/// Archive `src` into an in-memory tar stream.
///
/// Entries are written in sorted order, so the same tree always produces
/// the same archive. Symlinks are stored as links, not followed.
pub async fn build_archive(src: &Path, excludes: &ExcludeSet) -> Result<Bytes, ArchiveError> {
    let src = src.to_owned();
    let excludes = excludes.clone();
    let join_path = src.clone();

    spawn_blocking(move || build_archive_sync(&src, &excludes))
        .await
        .map_err(|e| ArchiveError {
            path: join_path,
            source: e.into(),
        })?
}

fn build_archive_sync(src: &Path, excludes: &ExcludeSet) -> Result<Bytes, ArchiveError> {
    let mut tar_data = Vec::new();
    let mut entries = 0usize;

    {
        let mut tar_builder = tar::Builder::new(&mut tar_data);
        tar_builder.follow_symlinks(false);

        for path in walk(src, src, excludes)? {
            let relative_path = path.strip_prefix(src).map_err(|e| ArchiveError {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
            })?;

            let meta = std::fs::symlink_metadata(&path).map_err(|source| ArchiveError {
                path: path.clone(),
                source,
            })?;

            let appended = if meta.is_dir() {
                tar_builder.append_dir(relative_path, &path)
            } else {
                tar_builder.append_path_with_name(&path, relative_path)
            };
            appended.map_err(|source| ArchiveError {
                path: path.clone(),
                source,
            })?;
            entries += 1;
        }

        tar_builder.finish().map_err(|source| ArchiveError {
            path: src.to_path_buf(),
            source,
        })?;
    }

    debug!(entries, size = tar_data.len(), "created build context archive");

    Ok(Bytes::from(tar_data))
}

fn walk(root: &Path, dir: &Path, excludes: &ExcludeSet) -> Result<Vec<PathBuf>, ArchiveError> {
    let read = std::fs::read_dir(dir).map_err(|source| ArchiveError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut children = Vec::new();
    for entry in read {
        let entry = entry.map_err(|source| ArchiveError {
            path: dir.to_path_buf(),
            source,
        })?;
        children.push(entry.path());
    }
    children.sort();

    let mut paths = Vec::new();
    for path in children {
        let relative = path.strip_prefix(root).unwrap_or(&path);
        if excludes.is_excluded(relative) {
            continue;
        }

        let is_dir = std::fs::symlink_metadata(&path)
            .map(|m| m.is_dir())
            .unwrap_or(false);
        paths.push(path.clone());

        if is_dir {
            paths.extend(walk(root, &path, excludes)?);
        }
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    fn entry_names(data: &Bytes) -> Vec<String> {
        let mut archive = tar::Archive::new(std::io::Cursor::new(data.to_vec()));
        archive
            .entries()
            .unwrap()
            .map(|e| {
                e.unwrap()
                    .path()
                    .unwrap()
                    .to_string_lossy()
                    .trim_end_matches('/')
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn nested_excluded_names_match_by_component() {
        let excludes = ExcludeSet::default();
        assert!(excludes.is_excluded(Path::new("node_modules")));
        assert!(excludes.is_excluded(Path::new("packages/ui/node_modules/react/index.js")));
        assert!(excludes.is_excluded(Path::new(".env.local")));
        assert!(!excludes.is_excluded(Path::new(".env")));
        assert!(!excludes.is_excluded(Path::new(".env.production")));
        assert!(!excludes.is_excluded(Path::new("src/node_modules_notes.md")));
    }

    #[test]
    fn extra_names_are_added_once() {
        let excludes = ExcludeSet::new(["coverage", "node_modules", "/tmp/"]);
        assert_eq!(
            excludes.names(),
            &["node_modules", ".git", ".next", ".env*.local", "coverage", "tmp"]
        );
    }

    #[test]
    fn local_env_files_match_for_every_environment() {
        let excludes = ExcludeSet::default();
        for name in [".env.local", ".env.production.local", ".env.development.local"] {
            assert!(excludes.is_excluded(Path::new(name)), "{name} not excluded");
        }
        assert!(!excludes.is_excluded(Path::new(".envlocal")));
        assert!(!excludes.is_excluded(Path::new("app/.env.local.example")));
    }

    #[tokio::test]
    async fn archive_skips_excluded_trees() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::write(root.join("package.json"), "{}").unwrap();
        std::fs::create_dir_all(root.join("app")).unwrap();
        std::fs::write(root.join("app/page.tsx"), "export default 1").unwrap();
        std::fs::create_dir_all(root.join("node_modules/next")).unwrap();
        std::fs::write(root.join("node_modules/next/index.js"), "").unwrap();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        std::fs::write(root.join(".git/HEAD"), "ref").unwrap();
        std::fs::create_dir_all(root.join(".next/cache")).unwrap();
        std::fs::write(root.join(".env.local"), "SECRET=1").unwrap();
        std::fs::write(root.join(".env.production.local"), "SECRET=2").unwrap();

        let data = build_archive(root, &ExcludeSet::default()).await.unwrap();
        let names = entry_names(&data);

        assert_eq!(names, vec!["app", "app/page.tsx", "package.json"]);
    }

    #[tokio::test]
    async fn archive_preserves_contents() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Dockerfile"), "FROM node:18-alpine\n").unwrap();

        let data = build_archive(dir.path(), &ExcludeSet::default()).await.unwrap();
        let mut archive = tar::Archive::new(std::io::Cursor::new(data.to_vec()));
        let mut entry = archive.entries().unwrap().next().unwrap().unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();

        assert_eq!(content, "FROM node:18-alpine\n");
    }

    #[tokio::test]
    async fn missing_directory_is_an_archive_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");

        let err = build_archive(&missing, &ExcludeSet::default()).await.unwrap_err();
        assert_eq!(err.path, missing);
    }
}
