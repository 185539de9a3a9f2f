use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the JSON log formatter. Level comes from `RUST_LOG`.
pub fn init() {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(DEFAULT_LOG_FILTER),
    };

    tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}
