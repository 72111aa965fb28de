// ABOUTME: Settings scaffolding for generated projects.
// ABOUTME: Writes a commented buzzcraft.deploy.yml holding the defaults.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::{SETTINGS_FILENAME, Settings};

/// Write a settings template into `dir`, returning its path.
pub fn init_settings(dir: &Path, force: bool) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(Error::ProjectNotFound(dir.to_path_buf()));
    }

    let path = dir.join(SETTINGS_FILENAME);

    if path.exists() && !force {
        return Err(Error::AlreadyExists(path));
    }

    let yaml = generate_template_yaml(&Settings::default());
    std::fs::write(&path, yaml)?;

    Ok(path)
}

fn generate_template_yaml(settings: &Settings) -> String {
    format!(
        r#"# Deployment settings for this project. Every key is optional.
container_prefix: {}
image_namespace: {}
default_port: {}
base_image: {}

# Runtime is auto-detected (Podman, then Docker) unless set here.
# runtime: docker
# socket: /var/run/docker.sock

restart: {}

stop:
  timeout: {}

health:
  attempts: {}
  interval: {}
  timeout: {}
  log_tail: {}

# Extra files or directories to leave out of the image build context.
exclude: []
"#,
        settings.container_prefix,
        settings.image_namespace,
        settings.default_port,
        settings.base_image,
        settings.restart,
        format_secs(settings.stop.timeout),
        settings.health.attempts,
        format_secs(settings.health.interval),
        format_secs(settings.health.timeout),
        settings.health.log_tail,
    )
}

fn format_secs(d: std::time::Duration) -> String {
    format!("{}s", d.as_secs())
}
