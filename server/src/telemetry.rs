//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Initialize tracing for the process. `RUST_LOG` overrides the configured
/// filter. Production logs are JSON; everything else is human-readable.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let _ = if config.environment.is_production() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    #[test]
    fn init_twice_is_harmless() {
        let config = Config {
            environment: Environment::Test,
            ..Config::default()
        };
        init(&config);
        init(&config);
        tracing::info!("still logging");
    }
}
