use std::backtrace::Backtrace;

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Installs the global subscriber for the web server. `RUST_LOG` overrides
/// the configured directive.
pub fn init_tracing(logging: &LoggingConfig) {
    install(&logging.rust_log, false);
    set_panic_hook();
}

/// Subscriber for the maintenance binary: compact, with targets, quieter by default.
pub fn init_cli_tracing(verbose: bool) {
    let directive = if verbose { "debug,sqlx=warn" } else { "info,sqlx=warn" };
    install(directive, true);
}

fn install(directive: &str, with_target: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    // a second init (tests, repeated CLI setup) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(with_target)
        .try_init();
}

fn set_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let message = if let Some(message) = info.payload().downcast_ref::<&str>() {
            *message
        } else if let Some(message) = info.payload().downcast_ref::<String>() {
            message.as_str()
        } else {
            "unknown panic"
        };

        let backtrace = Backtrace::capture();
        match info.location() {
            Some(location) => tracing::error!(
                panic = %message,
                location = %location,
                backtrace = %backtrace,
                "panic"
            ),
            None => tracing::error!(panic = %message, backtrace = %backtrace, "panic"),
        }
    }));
}
