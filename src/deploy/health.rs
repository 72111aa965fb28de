// ABOUTME: Bounded post-deployment health polling.
// ABOUTME: Timeouts are warnings; the container's log tail is pulled once for diagnostics.

use crate::config::HealthConfig;
use crate::diagnostics::{Diagnostics, Warning};
use crate::runtime::LogOps;
use crate::types::{ContainerId, HostPort};
use futures::StreamExt;
use serde::Serialize;

use super::network::local_url;
use super::probe::{HealthProbe, is_serving};

/// What the probe saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// A 2xx/3xx response arrived within the attempt budget.
    pub healthy: bool,
    /// Attempts made, including the successful one.
    pub attempts: u32,
    /// Last status code seen, if any request got a response.
    pub last_status: Option<u16>,
    /// Container log tail, fetched only when the site never became healthy.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<String>,
}

pub struct HealthVerifier<'a, P: ?Sized> {
    probe: &'a P,
    policy: &'a HealthConfig,
}

impl<'a, P: HealthProbe + ?Sized> HealthVerifier<'a, P> {
    pub fn new(probe: &'a P, policy: &'a HealthConfig) -> Self {
        Self { probe, policy }
    }

    /// Poll until the site answers or the attempts run out.
    ///
    /// Never fails. Probe errors and per-request timeouts count as failed
    /// attempts. On exhaustion the container's recent output is fetched and
    /// a warning is recorded.
    pub async fn verify<R: LogOps + ?Sized>(
        &self,
        port: HostPort,
        container: &ContainerId,
        runtime: &R,
        diagnostics: &mut Diagnostics,
    ) -> HealthReport {
        let attempts = self.policy.attempts.max(1);
        let mut last_status = None;

        for attempt in 1..=attempts {
            match tokio::time::timeout(self.policy.timeout, self.probe.get(port)).await {
                Ok(Ok(status)) if is_serving(status) => {
                    tracing::info!(port = port.get(), attempt, status, "site is serving");
                    return HealthReport {
                        healthy: true,
                        attempts: attempt,
                        last_status: Some(status),
                        logs: Vec::new(),
                    };
                }
                Ok(Ok(status)) => {
                    tracing::debug!(port = port.get(), attempt, status, "site not ready");
                    last_status = Some(status);
                }
                Ok(Err(e)) => {
                    tracing::debug!(port = port.get(), attempt, error = %e, "probe failed");
                }
                Err(_) => {
                    tracing::debug!(port = port.get(), attempt, "probe timed out");
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.policy.interval).await;
            }
        }

        let logs = fetch_log_tail(runtime, container, self.policy.log_tail, diagnostics).await;

        diagnostics.warn(Warning::health_timeout(format!(
            "{} did not respond after {} attempts; the deployment is reported as successful",
            local_url(port),
            attempts
        )));

        HealthReport {
            healthy: false,
            attempts,
            last_status,
            logs,
        }
    }
}

async fn fetch_log_tail<R: LogOps + ?Sized>(
    runtime: &R,
    container: &ContainerId,
    tail: u64,
    diagnostics: &mut Diagnostics,
) -> Vec<String> {
    let mut stream = runtime.recent_logs(container, tail);
    let mut lines = Vec::new();

    while let Some(item) = stream.next().await {
        match item {
            Ok(line) => lines.extend(line.text.lines().map(str::to_string)),
            Err(e) => {
                diagnostics.warn(Warning::log_fetch(format!(
                    "could not read logs of {}: {}",
                    container.short(),
                    e
                )));
                break;
            }
        }
    }

    for line in &lines {
        tracing::warn!(container = container.short(), "{}", line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::WarningKind;
    use crate::runtime::fake::{Call, FakeRuntime};
    use crate::deploy::probe::ProbeError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Answers with the scripted statuses in order, then the last one forever.
    struct Scripted {
        responses: Vec<Result<u16, ()>>,
        calls: AtomicU32,
    }

    impl Scripted {
        fn new(responses: Vec<Result<u16, ()>>) -> Self {
            Self {
                responses,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl HealthProbe for Scripted {
        async fn get(&self, _port: HostPort) -> Result<u16, ProbeError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            let response = self.responses[n.min(self.responses.len() - 1)];
            response.map_err(|()| ProbeError::Connect("connection refused".to_string()))
        }
    }

    struct Hangs;

    #[async_trait]
    impl HealthProbe for Hangs {
        async fn get(&self, _port: HostPort) -> Result<u16, ProbeError> {
            std::future::pending().await
        }
    }

    fn policy(attempts: u32) -> HealthConfig {
        HealthConfig {
            attempts,
            interval: Duration::ZERO,
            timeout: Duration::from_millis(50),
            log_tail: 50,
        }
    }

    fn port() -> HostPort {
        HostPort::parse("3100").unwrap()
    }

    #[tokio::test]
    async fn stops_at_first_success() {
        let probe = Scripted::new(vec![Err(()), Ok(503), Ok(200), Ok(200)]);
        let runtime = FakeRuntime::new();
        let policy = policy(20);
        let mut diagnostics = Diagnostics::default();

        let report = HealthVerifier::new(&probe, &policy)
            .verify(port(), &ContainerId::new("c1"), &runtime, &mut diagnostics)
            .await;

        assert!(report.healthy);
        assert_eq!(report.attempts, 3);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 3);
        assert!(!diagnostics.has_warnings());
        assert!(runtime.calls().is_empty());
    }

    #[tokio::test]
    async fn exhaustion_fetches_logs_once_and_warns() {
        let probe = Scripted::new(vec![Ok(500)]);
        let runtime = FakeRuntime::new().with_logs(&["Error: Cannot find module 'next'\nat boot"]);
        let policy = policy(4);
        let mut diagnostics = Diagnostics::default();

        let report = HealthVerifier::new(&probe, &policy)
            .verify(port(), &ContainerId::new("c1"), &runtime, &mut diagnostics)
            .await;

        assert!(!report.healthy);
        assert_eq!(report.attempts, 4);
        assert_eq!(report.last_status, Some(500));
        assert_eq!(report.logs, vec!["Error: Cannot find module 'next'", "at boot"]);
        assert_eq!(
            runtime.calls(),
            vec![Call::Logs {
                id: "c1".to_string(),
                lines: 50
            }]
        );
        assert_eq!(diagnostics.warnings()[0].kind, WarningKind::HealthTimeout);
    }

    #[tokio::test]
    async fn hanging_requests_count_as_failed_attempts() {
        let runtime = FakeRuntime::new();
        let policy = policy(2);
        let mut diagnostics = Diagnostics::default();

        let report = HealthVerifier::new(&Hangs, &policy)
            .verify(port(), &ContainerId::new("c1"), &runtime, &mut diagnostics)
            .await;

        assert!(!report.healthy);
        assert_eq!(report.last_status, None);
    }
}
