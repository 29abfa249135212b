#[cfg(feature = "trace")]
use std::path::Path;
#[cfg(feature = "trace")]
use std::sync::Once;

#[cfg(feature = "trace")]
static INIT: Once = Once::new();

#[cfg(feature = "trace")]
const DEFAULT_FILTER: &str = "singlish_engine=debug,singlish_core=debug";

#[cfg(feature = "trace")]
fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER))
}

/// Keeps the non-blocking log writer alive. Dropping it flushes pending
/// records.
#[must_use]
pub struct TraceGuard {
    #[cfg(feature = "trace")]
    _guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Write JSON trace records to `singlish-trace.jsonl` in `log_dir`.
#[cfg(feature = "trace")]
pub fn init_tracing(log_dir: &Path) -> TraceGuard {
    let mut guard = None;
    INIT.call_once(|| {
        let file_appender = tracing_appender::rolling::never(log_dir, "singlish-trace.jsonl");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        tracing_subscriber::fmt()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
            .with_env_filter(env_filter())
            .init();
    });
    TraceGuard { _guard: guard }
}

/// Human-readable trace output on stderr, for interactive CLI use.
#[cfg(feature = "trace")]
pub fn init_stderr_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_env_filter(env_filter())
            .init();
    });
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: &std::path::Path) -> TraceGuard {
    TraceGuard {}
}

#[cfg(not(feature = "trace"))]
pub fn init_stderr_tracing() {}
