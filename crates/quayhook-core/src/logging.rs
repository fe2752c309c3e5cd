use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

pub const DEFAULT_LOG_FILTER: &str =
    "quayhook=info,quayhook_core=info,quayhook_web=info,tower_http=info";

pub const DEBUG_LOG_FILTER: &str =
    "quayhook=debug,quayhook_core=debug,quayhook_web=debug,tower_http=debug";

/// Installs the global subscriber. `RUST_LOG` wins over the built-in filter;
/// a non-empty `DEBUG` variable switches the built-in filter to debug.
pub fn init() {
    let default_filter = if debug_requested() {
        DEBUG_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    init_with_default(default_filter);
}

pub fn init_with_default(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .init();
}

fn debug_requested() -> bool {
    std::env::var("DEBUG")
        .map(|v| !v.is_empty())
        .unwrap_or(false)
}
