// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use crate::deploy::{DeploymentPhase, Progress};
use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    verbose: bool,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode, verbose: bool) -> Self {
        Self {
            mode,
            verbose,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration_secs(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a message only shown with `--verbose` in normal mode.
    pub fn detail(&self, message: &str) {
        if self.verbose && self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a non-fatal warning.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Warning: {message}");
            }
            OutputMode::Json => self.emit_stderr("warning", message),
        }
    }

    /// Print a final result line that already carries its own timing.
    /// Shown in normal and quiet mode.
    pub fn result(&self, message: &str) {
        if self.mode != OutputMode::Json {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                // Print only the essential result
                println!("{message}");
            }
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "success",
                    message,
                    duration_secs: self.duration_secs(),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => self.emit_stderr("error", message),
        }
    }

    /// Print a serializable result as one JSON line (JSON mode only).
    pub fn json<T: Serialize>(&self, value: &T) {
        if self.mode == OutputMode::Json
            && let Ok(json) = serde_json::to_string(value)
        {
            println!("{json}");
        }
    }

    fn emit_stderr(&self, event: &str, message: &str) {
        let event = JsonEvent {
            event,
            message,
            duration_secs: self.duration_secs(),
        };
        if let Ok(json) = serde_json::to_string(&event) {
            eprintln!("{json}");
        }
    }
}

impl Progress for Output {
    fn phase(&self, phase: DeploymentPhase) {
        let message = match phase {
            DeploymentPhase::Validating => "  → Validating project...",
            DeploymentPhase::BuildingImage => "  → Building image...",
            DeploymentPhase::ReplacingContainer => "  → Replacing container...",
            DeploymentPhase::ConfiguringNetwork => "  → Configuring access...",
            DeploymentPhase::HealthChecking => "  → Waiting for the site to respond...",
            DeploymentPhase::Recorded | DeploymentPhase::Failed => return,
        };

        if self.mode == OutputMode::Json {
            let event = JsonEvent {
                event: "phase",
                message: phase.as_str(),
                duration_secs: self.duration_secs(),
            };
            if let Ok(json) = serde_json::to_string(&event) {
                println!("{json}");
            }
        } else {
            self.progress(message);
        }
    }

    fn build_output(&self, line: &str) {
        self.detail(&format!("    {line}"));
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}
