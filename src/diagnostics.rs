// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects warnings that shouldn't fail a deployment but should be shown to users.

/// Collects non-fatal warnings during deployment operations.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Warning messages, in the order they were recorded.
    pub fn into_messages(self) -> Vec<String> {
        self.warnings.into_iter().map(|w| w.message).collect()
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create a health-check timeout warning.
    pub fn health_timeout(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::HealthTimeout,
            message: message.into(),
        }
    }

    /// Create a log fetch warning.
    pub fn log_fetch(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LogFetch,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The site never answered the health probe.
    HealthTimeout,
    /// Container logs could not be read for diagnostics.
    LogFetch,
}
