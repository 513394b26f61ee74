use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` wins when set; `level` is the fallback directive.
fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(level.parse().unwrap_or(Level::INFO.into()))
    })
}

/// Install the global fmt subscriber. Safe to call more than once.
pub fn init(level: &str) {
    let _ = fmt()
        .with_env_filter(filter(level))
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .try_init();
}

/// Subscriber for unit tests, writing through the test harness.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,opportunities=debug")),
        )
        .with_test_writer()
        .try_init();
}
