//! Logging initialization and configuration.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "recipe_box=info";

/// Initialize the logging system.
///
/// Uses the `RUST_LOG` environment variable for filtering. If not set,
/// defaults to `recipe_box=info`.
///
/// # Panics
///
/// Panics if another tracing subscriber has already been set.
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().compact())
        .init();
}

/// Try to initialize the logging system.
///
/// Returns `Err` if logging has already been initialized.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().compact())
        .try_init()
}

/// Initialize logging with an explicit filter such as `debug` or
/// `recipe_box=trace,tower_http=debug`.
///
/// A bare level applies to this crate only. Invalid filters fall back to
/// the default.
pub fn init_with_level(level: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(filter_for(level))
        .with(tracing_subscriber::fmt::layer().compact())
        .try_init()
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn filter_for(level: &str) -> EnvFilter {
    let directive = if is_bare_level(level) {
        format!("recipe_box={}", level)
    } else {
        level.to_string()
    };
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn is_bare_level(level: &str) -> bool {
    matches!(
        level.to_ascii_lowercase().as_str(),
        "error" | "warn" | "info" | "debug" | "trace" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_init_idempotent() {
        // Whichever test runs first installs the subscriber.
        let _ = try_init();
        let _ = try_init();
    }

    #[test]
    fn test_bare_level_detection() {
        assert!(is_bare_level("debug"));
        assert!(is_bare_level("WARN"));
        assert!(!is_bare_level("recipe_box=debug"));
        assert!(!is_bare_level("verbose"));
    }

    #[test]
    fn test_filter_for() {
        assert_eq!(filter_for("debug").to_string(), "recipe_box=debug");
        assert_eq!(
            filter_for("tower_http=trace").to_string(),
            "tower_http=trace"
        );
    }

    #[test]
    fn test_logging_works() {
        let _ = init_with_level("debug");

        tracing::info!("test info message");
        tracing::debug!("test debug message");
        tracing::warn!("test warn message");
    }
}
