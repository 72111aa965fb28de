// ABOUTME: Shared helper for connecting to the local container runtime.
// ABOUTME: Detects the socket, connects, and pings before any deployment work starts.

use buzzcraft_deploy::config::Settings;
use buzzcraft_deploy::error::Result;
use buzzcraft_deploy::output::Output;
use buzzcraft_deploy::runtime::{
    BollardRuntime, RuntimeError, RuntimeErrorKind, RuntimeInfoOps, detect_local,
};

/// Connect to the local container runtime.
///
/// This handles the common pattern of:
/// 1. Detecting the runtime type and socket path (settings may override)
/// 2. Outputting progress messages
/// 3. Establishing the connection and checking it answers
///
/// On failure a hint for the user is printed before the error is returned.
pub async fn connect_to_runtime(settings: &Settings, output: &Output) -> Result<BollardRuntime> {
    match connect(settings, output).await {
        Ok(runtime) => Ok(runtime),
        Err(e) => {
            if let Some(hint) = hint(e.kind()) {
                output.warning(hint);
            }
            Err(e.into())
        }
    }
}

async fn connect(
    settings: &Settings,
    output: &Output,
) -> std::result::Result<BollardRuntime, RuntimeError> {
    output.progress("  → Detecting runtime...");
    let runtime_info = detect_local(Some(&settings.runtime))?;

    output.progress(&format!(
        "  → Found {} at {}",
        runtime_info.runtime_type, runtime_info.socket_path
    ));

    let runtime = BollardRuntime::connect(&runtime_info)?;
    runtime.ping().await?;

    if output.is_verbose() {
        match runtime.info().await {
            Ok(meta) => output.detail(&format!("    {meta}")),
            Err(e) => tracing::debug!(error = %e, "runtime info unavailable"),
        }
    }

    Ok(runtime)
}

fn hint(kind: RuntimeErrorKind) -> Option<&'static str> {
    match kind {
        RuntimeErrorKind::NoRuntimeFound => {
            Some("install Docker or Podman, or set `runtime` and `socket` in buzzcraft.deploy.yml")
        }
        RuntimeErrorKind::SocketMissing => {
            Some("check the `socket` path in buzzcraft.deploy.yml")
        }
        RuntimeErrorKind::ConnectionFailed => {
            Some("the runtime socket exists but nothing answers; is the daemon running?")
        }
        RuntimeErrorKind::RuntimeOperation => None,
    }
}
