/*!
 * Structured Tracing
 * Subscriber setup and spans for simulation runs
 *
 * `log` records emitted by the scheduling core are bridged into the same
 * subscriber, so one `RUST_LOG` filter covers everything.
 */

use tracing::{info, span, Level, Span};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable that switches output to JSON
pub const ENV_TRACE_JSON: &str = "SCHED_SIM_TRACE_JSON";

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SCHED_SIM_TRACE_JSON: Enable JSON output (default: false)
///
/// Output goes to stderr. Later calls are ignored.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        // JSON output for parsing
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        // Human-readable output
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        info!(json = use_json, "Structured tracing initialized");
    }
}

/// Span covering one simulation run
pub fn run_span(policy: &str, processes: usize) -> Span {
    span!(Level::INFO, "simulation", policy = policy, processes = processes)
}
