use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Build the filter directive string for the subscriber.
///
/// When tracing is disabled in config, the crate's own target is silenced
/// while third-party targets keep the configured level.
fn filter_directives(config: &AppConfig) -> String {
    if config.enable_tracing {
        config.log_level.clone()
    } else {
        format!("{},bankcore=off", config.log_level)
    }
}

pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let file_appender = match config.rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => tracing_appender::rolling::daily(&config.log_dir, &config.log_file),
        _ => tracing_appender::rolling::never(&config.log_dir, &config.log_file),
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        let file_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).init();
    } else {
        let file_layer = fmt::layer()
            .with_target(false)
            .with_writer(non_blocking)
            .with_ansi(false);
        let stdout_layer = fmt::layer().with_target(false).with_ansi(true);
        registry.with(file_layer).with(stdout_layer).init();
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;

    fn test_config(enable_tracing: bool) -> AppConfig {
        AppConfig {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "bankcore.log".to_string(),
            use_json: false,
            rotation: "never".to_string(),
            enable_tracing,
            database: DatabaseConfig::default(),
        }
    }

    #[test]
    fn test_filter_directives_tracing_enabled() {
        assert_eq!(filter_directives(&test_config(true)), "info");
    }

    #[test]
    fn test_filter_directives_tracing_disabled() {
        assert_eq!(filter_directives(&test_config(false)), "info,bankcore=off");
    }
}
