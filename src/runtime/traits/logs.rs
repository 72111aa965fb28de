// ABOUTME: Recent container output, read after a site fails its health probe.
// ABOUTME: A bounded tail of stdout and stderr, never followed.

use super::sealed::Sealed;
use crate::types::ContainerId;
use futures::Stream;
use std::fmt;
use std::pin::Pin;

/// Output lines in the order the runtime sends them.
pub type LogLineStream<'a> = Pin<Box<dyn Stream<Item = Result<LogLine, LogError>> + Send + 'a>>;

pub trait LogOps: Sealed + Send + Sync {
    /// The last `lines` lines the container wrote to stdout and stderr.
    ///
    /// Nothing is requested until the stream is polled. An unknown
    /// container surfaces as the first item.
    fn recent_logs(&self, id: &ContainerId, lines: u64) -> LogLineStream<'_>;
}

/// One chunk of container output, usually a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub source: LogSource,
    pub text: String,
}

impl LogLine {
    pub fn stdout(text: impl Into<String>) -> Self {
        Self {
            source: LogSource::Stdout,
            text: text.into(),
        }
    }

    pub fn stderr(text: impl Into<String>) -> Self {
        Self {
            source: LogSource::Stderr,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    Stdout,
    Stderr,
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSource::Stdout => f.write_str("stdout"),
            LogSource::Stderr => f.write_str("stderr"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    #[error("log stream interrupted: {0}")]
    Interrupted(String),
}
