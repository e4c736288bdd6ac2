use crate::config::LogFormat;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

/// Install the global subscriber. stdout carries the protocol, so logs always go to stderr.
///
/// `RUST_LOG`, when set and valid, takes precedence over `log_level`.
pub fn init_subscriber(log_level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => filter_for(log_level)?,
    };

    let result = match format {
        LogFormat::Text => tracing::subscriber::set_global_default(
            Registry::default()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false)),
        ),
        LogFormat::Json => tracing::subscriber::set_global_default(
            Registry::default()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr)),
        ),
    };
    result.map_err(|e| anyhow::anyhow!("failed to set global subscriber: {e}"))
}

fn filter_for(log_level: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(log_level)
        .map_err(|e| anyhow::anyhow!("invalid log filter '{log_level}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_levels_and_directives() {
        assert!(filter_for("info").is_ok());
        assert!(filter_for("warn,content_ops_core=debug").is_ok());
    }

    #[test]
    fn rejects_malformed_filter() {
        assert!(filter_for("content_ops=notalevel").is_err());
    }
}
