//! Tracing subscriber setup.
//!
//! `APP_ENV=production` (or `prod`) emits one JSON object per line for log
//! shippers; any other environment gets coloured text. `RUST_LOG` overrides
//! the default filter.

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

pub fn is_production(environment: &str) -> bool {
    matches!(environment, "production" | "prod")
}

/// Install the global subscriber. Later calls leave the first one in place.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stdout);

    let _ = if is_production(&get_environment()) {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer.with_ansi(true)).try_init()
    };
}
