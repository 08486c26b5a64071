//! Logging initialization

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count
///
/// Only our own crates get the selected level; dependencies stay at `warn`.
pub fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,kubegraph={level},kubectl_graph={level}")
}

/// Initialize logging to stderr
///
/// `RUST_LOG` takes precedence over the verbosity flag. Stdout is left to
/// the rendered graph so DOT output can be piped.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(verbosity >= 2)
        .with_file(verbosity >= 3)
        .with_line_number(verbosity >= 3)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(
            default_directive(0),
            "warn,kubegraph=warn,kubectl_graph=warn"
        );
        assert!(default_directive(1).contains("kubegraph=info"));
        assert!(default_directive(2).contains("kubegraph=debug"));
        assert!(default_directive(3).contains("kubegraph=trace"));
        assert!(default_directive(9).contains("kubegraph=trace"));
    }

    #[test]
    fn test_directives_parse() {
        for verbosity in 0..4 {
            assert!(EnvFilter::try_new(default_directive(verbosity)).is_ok());
        }
    }
}
