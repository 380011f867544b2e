use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SPANAV_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Installs a stderr fmt subscriber filtered by `SPANAV_LOG`.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { "spanav=debug" } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
