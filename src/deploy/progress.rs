// ABOUTME: Progress sink the orchestrator reports phases and build output to.
// ABOUTME: The CLI renders it; library callers can ignore it with Silent.

use super::phase::DeploymentPhase;

pub trait Progress: Send + Sync {
    /// A deployment entered `phase`.
    fn phase(&self, _phase: DeploymentPhase) {}

    /// One line of image build output.
    fn build_output(&self, _line: &str) {}
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Progress for Silent {}
