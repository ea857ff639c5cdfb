//! Log setup for the `ledgerline` binary.
//!
//! Stdout carries the JSON a command prints, so every log line goes to
//! stderr. `RUST_LOG` wins when set; otherwise `--log-level` (default
//! `warn`) applies, which keeps a plain `submit --wait` quiet apart from
//! transient-retry warnings. `--log-level ledgerline_client=debug` shows
//! each poll cycle.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable, colored output.
    Pretty,
    /// Machine-parseable JSON lines.
    Json,
}

/// Install the global subscriber. Only the subcommands that talk to a node
/// call this; `keygen` and `version` print without logging.
pub fn init_logging(default_level: &str, format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(true);
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(stderr).init(),
        LogFormat::Json => registry.with(stderr.json()).init(),
    }

    tracing::debug!(?format, default_level, "logging ready");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ValueEnum;

    #[test]
    fn log_format_parses_from_flag_values() {
        assert_eq!(LogFormat::from_str("json", true), Ok(LogFormat::Json));
        assert_eq!(LogFormat::from_str("Pretty", true), Ok(LogFormat::Pretty));
        assert!(LogFormat::from_str("xml", true).is_err());
    }
}
