use tracing_subscriber::EnvFilter;

/// Installs the JSON log subscriber. Level comes from `RUST_LOG`, default
/// `info`. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_current_span(false)
        .try_init();
}
