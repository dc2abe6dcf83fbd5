use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` and falls back to debug output for this crate.
/// Calling this more than once is harmless; later calls leave the first
/// subscriber in place.
pub fn init() {
    let installed = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if installed.is_ok() {
        tracing::info!(
            service = "identity-service",
            version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized"
        );
    }
}
