//! Log output setup.
//!
//! Development gets pretty, source-annotated output at `debug`; production
//! emits flattened JSON lines at `info` with the current span's fields
//! (request id, method, uri) attached. `RUST_LOG` overrides either default.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

const DEV_FILTER: &str = "debug,tower_http=debug,sqlx=warn";
const PROD_FILTER: &str = "info,tower_http=info,sqlx=warn";

fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn init_tracing(env: &Environment) {
    let registry = tracing_subscriber::registry();

    if env.is_production() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(true)
                    .with_filter(filter_or(PROD_FILTER)),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(filter_or(DEV_FILTER)),
            )
            .init();
    }

    tracing::info!(environment = ?env, "Tracing initialized");
}
