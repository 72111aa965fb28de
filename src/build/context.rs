// ABOUTME: Generated build-context files for Next.js projects.
// ABOUTME: A multi-step Dockerfile and a .dockerignore, written into the project directory.

use super::archive::{ArchiveError, DEFAULT_EXCLUDES};
use crate::types::ImageRef;
use std::path::Path;

pub const DOCKERFILE: &str = "Dockerfile";
pub const DOCKERIGNORE: &str = ".dockerignore";

/// Build descriptor for a Next.js site served by `npm start` on port 3000
/// as an unprivileged user.
pub fn dockerfile(base_image: &ImageRef) -> String {
    format!(
        r#"FROM {base_image}

WORKDIR /app

COPY package*.json ./
RUN npm install

COPY . .

ARG NODE_ENV=production
ENV NODE_ENV=$NODE_ENV

RUN chmod +x node_modules/.bin/next
RUN npm run build

RUN addgroup --system --gid 1001 nodejs
RUN adduser --system --uid 1001 nextjs
RUN chown -R nextjs:nodejs /app

USER nextjs

EXPOSE 3000
ENV PORT=3000

CMD ["npm", "start"]
"#
    )
}

/// The archive exclusions plus the two generated files.
pub fn dockerignore() -> String {
    let mut content = String::new();
    for name in DEFAULT_EXCLUDES.iter().chain(&[DOCKERFILE, DOCKERIGNORE]) {
        content.push_str(name);
        content.push('\n');
    }
    content
}

/// Write the Dockerfile and .dockerignore into `project`, replacing any
/// previous copies.
pub async fn write_build_context(project: &Path, base_image: &ImageRef) -> Result<(), ArchiveError> {
    for (name, content) in [
        (DOCKERFILE, dockerfile(base_image)),
        (DOCKERIGNORE, dockerignore()),
    ] {
        let path = project.join(name);
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| ArchiveError { path, source })?;
    }

    tracing::debug!(project = %project.display(), "wrote build context files");
    Ok(())
}
