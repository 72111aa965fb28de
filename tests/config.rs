// ABOUTME: Integration tests for settings loading and discovery.
// ABOUTME: Covers defaults, overrides, and rejection of unusable values.

use buzzcraft_deploy::config::{RestartPolicy, SETTINGS_FILENAME, SETTINGS_FILENAME_ALT, Settings};
use buzzcraft_deploy::runtime::RuntimeType;
use buzzcraft_deploy::types::ProjectId;
use std::fs;
use std::time::Duration;

#[test]
fn discover_without_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::discover(dir.path()).unwrap();

    assert_eq!(settings.container_prefix, "buzzcraft");
    assert_eq!(settings.default_port.get(), 3000);
    assert_eq!(settings.base_image.to_string(), "node:18-alpine");
    assert_eq!(settings.health.attempts, 20);
    assert_eq!(settings.health.interval, Duration::from_secs(3));
    assert!(settings.runtime.runtime.is_none());
}

#[test]
fn discover_reads_primary_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(SETTINGS_FILENAME),
        r#"
container_prefix: sites
default_port: 4100
runtime: docker
socket: /tmp/docker.sock
restart: always
health:
  attempts: 5
  interval: 500ms
exclude:
  - coverage
"#,
    )
    .unwrap();

    let settings = Settings::discover(dir.path()).unwrap();

    assert_eq!(settings.container_prefix, "sites");
    assert_eq!(settings.default_port.get(), 4100);
    assert_eq!(settings.runtime.runtime, Some(RuntimeType::Docker));
    assert_eq!(settings.runtime.socket.as_deref(), Some("/tmp/docker.sock"));
    assert_eq!(settings.restart, RestartPolicy::Always);
    assert_eq!(settings.health.attempts, 5);
    assert_eq!(settings.health.interval, Duration::from_millis(500));
    assert_eq!(settings.health.timeout, Duration::from_secs(5));
    assert_eq!(settings.exclude, vec!["coverage".to_string()]);
}

#[test]
fn discover_falls_back_to_yaml_extension() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(SETTINGS_FILENAME_ALT), "image_namespace: acme\n").unwrap();

    let settings = Settings::discover(dir.path()).unwrap();
    let id = ProjectId::new("blog").unwrap();

    assert_eq!(settings.image_tag(&id).unwrap().to_string(), "acme/blog:latest");
}

#[test]
fn empty_file_is_defaults() {
    let settings = Settings::from_yaml("  \n").unwrap();
    assert_eq!(settings.image_namespace, "buzzcraft");
}

#[test]
fn rejects_zero_attempts() {
    let err = Settings::from_yaml("health:\n  attempts: 0\n").unwrap_err();
    assert!(err.to_string().contains("health.attempts"));
}

#[test]
fn rejects_out_of_range_port() {
    assert!(Settings::from_yaml("default_port: 0\n").is_err());
    assert!(Settings::from_yaml("default_port: 70000\n").is_err());
}

#[test]
fn bad_prefix_surfaces_as_invalid_config() {
    let settings = Settings::from_yaml("container_prefix: \"-bad\"\n").unwrap();
    let id = ProjectId::new("blog").unwrap();

    let err = settings.container_name(&id).unwrap_err();
    assert!(err.to_string().contains("container_prefix"));
}

#[test]
fn generated_template_loads_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = buzzcraft_deploy::config::init_settings(dir.path(), false).unwrap();

    let loaded = Settings::load(&path).unwrap();
    let defaults = Settings::default();

    assert_eq!(loaded.container_prefix, defaults.container_prefix);
    assert_eq!(loaded.default_port, defaults.default_port);
    assert_eq!(loaded.base_image, defaults.base_image);
    assert_eq!(loaded.restart, defaults.restart);
    assert_eq!(loaded.health.attempts, defaults.health.attempts);
    assert_eq!(loaded.health.interval, defaults.health.interval);
    assert_eq!(loaded.stop.timeout, defaults.stop.timeout);
}
