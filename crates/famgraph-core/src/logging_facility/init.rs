//! Logging initialization module

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl Profile {
    /// Default filter directive when `RUST_LOG` is unset
    pub fn default_directive(&self) -> &'static str {
        match self {
            Profile::Development => "famgraph=debug",
            Profile::Production => "famgraph=info",
            Profile::Test => "famgraph=trace",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Call once at startup; later calls are ignored. `RUST_LOG` overrides the
/// profile's default directive. Output goes to stderr so that commands
/// writing JSON to stdout stay machine-readable.
///
/// # Example
///
/// ```
/// use famgraph_core::logging_facility::{init, Profile};
///
/// init(Profile::Production);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_directive()));

        match profile {
            Profile::Development => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .try_init();
            }
            Profile::Production => {
                let _ = tracing_subscriber::fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .try_init();
            }
            Profile::Test => {
                // Test capture installs its own layer via init_test_capture()
                let _ = tracing_subscriber::registry().try_init();
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_target_famgraph() {
        for profile in [Profile::Development, Profile::Production, Profile::Test] {
            assert!(profile.default_directive().starts_with("famgraph="));
        }
    }

    #[test]
    fn test_profile_equality() {
        assert_eq!(Profile::Development, Profile::Development);
        assert_ne!(Profile::Development, Profile::Production);
    }
}
