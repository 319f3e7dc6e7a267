use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use crate::formatter::GameClockFormatter;

static SUBSCRIBER_INIT: std::sync::Once = std::sync::Once::new();

/// Installs the global subscriber. Later calls do nothing.
///
/// `RUST_LOG` overrides the default of `info` for this crate and `warn` elsewhere.
pub fn setup_logging() {
    SUBSCRIBER_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,{name}=info", name = env!("CARGO_CRATE_NAME"))));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .event_format(GameClockFormatter)
            .finish()
            .with(ErrorLayer::default());

        if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Could not install the log subscriber: {error}");
        }
    });
}
