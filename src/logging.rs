//! Tracing subscriber initialisation.
//!
//! Only the binaries call [`init_logging`]; the library only emits events.
//! `RUST_LOG` overrides the configured level when set.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::types::errors::AppError;
use crate::types::settings::{LogFormat, LoggingSettings};

/// Builds the filter: `RUST_LOG` wins, otherwise the configured level applies to this crate.
fn build_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quran_bookmarks={}", settings.level)))
}

/// Installs the global subscriber, writing to stderr so stdout stays free for RPC.
///
/// Returns an error if a subscriber is already installed in this process.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), AppError> {
    let filter = build_filter(settings);
    let registry = tracing_subscriber::registry().with(filter);

    let result = match settings.format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| AppError::Logging(e.to_string()))
}
