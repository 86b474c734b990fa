use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming a log file. When unset, logs go to stderr.
pub const LOG_FILE_ENV: &str = "MAINTENANCE_GATE_LOG";

/// Initialize tracing.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_path = std::env::var(LOG_FILE_ENV).ok();
    let file = match log_path.as_deref().map(std::fs::File::create) {
        Some(Ok(file)) => Some(file),
        Some(Err(e)) => {
            eprintln!("Warning: Failed to create log file {:?}: {}", log_path, e);
            None
        }
        None => None,
    };

    let timer = fmt::time::UtcTime::rfc_3339();

    match file {
        Some(file) => {
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_timer(timer);
            tracing_subscriber::registry().with(filter).with(file_layer).init();
        }
        None => {
            let stderr_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_timer(timer);
            tracing_subscriber::registry().with(filter).with(stderr_layer).init();
        }
    }
}
