//! Logging setup and span constructors.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the verbosity flag when set.
pub fn init(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose))),
        )
        .with_target(true)
        .init();
}

/// Standardized span constructors for bot observability.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Span for one inbound protocol line.
    pub fn message(command: &str, code: u16, source: &str) -> Span {
        debug_span!("irc.message", command = %command, code = code, source = %source)
    }

    /// Span for one handler call.
    pub fn handler(event: &str, handler: &str) -> Span {
        debug_span!("handler", event = %event, handler = %handler)
    }

    /// Span for a periodic task's lifetime.
    pub fn periodic(name: &str, interval_secs: u64) -> Span {
        info_span!("periodic", name = %name, interval_secs = interval_secs)
    }

    /// Span for the server connection.
    pub fn connection(server: &str, port: u16) -> Span {
        info_span!("connection", server = %server, port = port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(1), "info");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(7), "debug");
    }
}
