use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Core logs stay quiet by default; info lines would break up the reel line.
pub const DEFAULT_FILTER: &str = "vibe_slot=info,slot_core=warn";

/// Log to stderr so the reel display on stdout stays clean.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
