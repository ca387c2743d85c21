use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// configured level when set.
pub fn init_tracing(config: &LoggingConfig) {
    let default_directive = format!("{},tower_http=debug", config.level);
    let filter = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::new(filter));
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("Warning: tracing subscriber already installed: {}", e);
    }
}

/// Install the Prometheus recorder. Without it the `metrics` macros are
/// no-ops and `/metrics` answers 404.
pub fn install_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install metrics recorder");
            None
        }
    }
}
