//! Logging and tracing setup for mimemagic.
//!
//! The library itself only emits `tracing` events; embedding programs and
//! tests call one of the initializers below to see them. Filtering follows
//! `RUST_LOG` (default `info`); rule-file problems log under the
//! `mimemagic::magic` targets, per-query decisions under `mimemagic::sniffer`.

use std::sync::Once;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

static INIT: Once = Once::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global tracing subscriber.
///
/// Subsequent calls are ignored, as is a subscriber installed by someone
/// else first.
pub fn init_tracing() {
    INIT.call_once(|| {
        let fmt_layer = fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        if tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt_layer)
            .try_init()
            .is_ok()
        {
            info!("mimemagic tracing initialized");
        }
    });
}

/// Initialize tracing with JSON output for structured logging.
pub fn init_tracing_json() {
    INIT.call_once(|| {
        let fmt_layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_current_span(true);

        if tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt_layer)
            .try_init()
            .is_ok()
        {
            info!("mimemagic tracing initialized (JSON mode)");
        }
    });
}
