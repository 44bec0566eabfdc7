use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "contribution_analyzer=info";
const VERBOSE_DIRECTIVE: &str = "contribution_analyzer=debug";

fn env_filter(verbose: bool) -> EnvFilter {
    let directive = if verbose {
        VERBOSE_DIRECTIVE
    } else {
        DEFAULT_DIRECTIVE
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// Initializes console logging on stderr, plus a daily JSON log file when
/// `log_dir` is given. Keep the returned guard alive until exit so the file
/// writer flushes.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // stdout carries the report
    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => match fs::create_dir_all(dir) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(dir, "analyzer.log");
                let (writer, guard) = tracing_appender::non_blocking(file_appender);
                (Some(fmt::layer().json().with_writer(writer)), Some(guard))
            }
            Err(e) => {
                eprintln!("Could not create log directory '{}': {}", dir.display(), e);
                (None, None)
            }
        },
        None => (None, None),
    };

    // try_init so tests and repeated calls do not panic
    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(console_layer)
        .with(file_layer)
        .try_init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let _guard = init_logging(false, Some(dir.path()));
        let _again = init_logging(true, None);
    }
}
