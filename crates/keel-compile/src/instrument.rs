//! Compile timing and statistics
//!
//! Every compile is timed. Successful compiles are logged at notice severity
//! for remote callers; local (interactive) callers are not logged so a single
//! compile does not show up twice. Statistics are recorded for all callers.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use keel_core::{CallContext, Node};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Counters for compiles served by one service instance
#[derive(Debug, Default)]
pub struct CompileStats {
    attempted: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    total_micros: AtomicU64,
}

/// Point-in-time copy of `CompileStats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileStatsSnapshot {
    /// Compiles started
    pub attempted: u64,
    /// Compiles that produced an artifact
    pub succeeded: u64,
    /// Compiles that returned an error
    pub failed: u64,
    /// Time spent compiling, in microseconds
    pub total_micros: u64,
}

impl CompileStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished compile
    pub fn record(&self, elapsed: Duration, succeeded: bool) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
        if succeeded {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.total_micros.fetch_add(micros, Ordering::Relaxed);
    }

    /// Copy the current counters
    pub fn snapshot(&self) -> CompileStatsSnapshot {
        CompileStatsSnapshot {
            attempted: self.attempted.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            total_micros: self.total_micros.load(Ordering::Relaxed),
        }
    }
}

/// "Compiled configuration for {name}[ in environment {env}]"
pub fn compile_message(node: &Node) -> String {
    match &node.environment {
        Some(env) => format!("Compiled configuration for {} in environment {}", node.name, env),
        None => format!("Compiled configuration for {}", node.name),
    }
}

/// Run `work`, time it, record it and log success at notice severity.
pub(crate) async fn benchmark<T, E, F>(
    ctx: &CallContext,
    message: &str,
    stats: &CompileStats,
    work: F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let started = Instant::now();
    let result = work.await;
    let elapsed = started.elapsed();
    stats.record(elapsed, result.is_ok());

    if result.is_ok() && !ctx.is_local {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        info!(
            severity = "notice",
            elapsed_ms,
            "{} in {:.2} seconds",
            message,
            elapsed.as_secs_f64()
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_testkit::LogCapture;

    #[test]
    fn test_compile_message() {
        assert_eq!(compile_message(&Node::new("web01")), "Compiled configuration for web01");
        assert_eq!(
            compile_message(&Node::new("web01").with_environment("staging")),
            "Compiled configuration for web01 in environment staging"
        );
    }

    #[tokio::test]
    async fn test_benchmark_logs_remote_success() {
        let capture = LogCapture::new();
        let _guard = capture.install();
        let stats = CompileStats::new();

        let ctx = CallContext::remote("web01", None);
        let out: Result<u8, ()> = benchmark(&ctx, "Compiled configuration for web01", &stats, async { Ok(7) }).await;

        assert_eq!(out, Ok(7));
        let events = capture.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].message.starts_with("Compiled configuration for web01 in "));
        assert_eq!(events[0].field("severity"), Some("notice"));
        assert!(events[0].field("elapsed_ms").is_some());
        assert_eq!(stats.snapshot().succeeded, 1);
    }

    #[tokio::test]
    async fn test_benchmark_is_silent_for_local_callers() {
        let capture = LogCapture::new();
        let _guard = capture.install();
        let stats = CompileStats::new();

        let out: Result<u8, ()> =
            benchmark(&CallContext::local(), "Compiled configuration for web01", &stats, async { Ok(7) }).await;

        assert!(out.is_ok());
        assert!(capture.events().is_empty());
        assert_eq!(stats.snapshot().attempted, 1);
    }

    #[tokio::test]
    async fn test_benchmark_records_failures_without_notice() {
        let capture = LogCapture::new();
        let _guard = capture.install();
        let stats = CompileStats::new();

        let ctx = CallContext::anonymous_remote();
        let out: Result<u8, &str> = benchmark(&ctx, "Compiled configuration for web01", &stats, async { Err("boom") }).await;

        assert_eq!(out, Err("boom"));
        assert!(capture.events().is_empty());
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.succeeded, 0);
    }
}
