use tracing_subscriber::EnvFilter;

use crate::domain::error::AppError;
use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::{start_server, HttpState};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load configuration, build the pipeline and serve until shutdown.
/// Configuration problems are fatal.
pub async fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load().map_err(fatal)?;
    let state = HttpState::from_config(&config).map_err(fatal)?;
    let bind = config.bind_address();

    tracing::info!(
        host = %bind.0,
        port = bind.1,
        fuzzy_threshold = config.mapping.fuzzy_threshold,
        max_upload_bytes = config.server.max_upload_bytes,
        "Starting fieldsift HTTP server"
    );

    start_server(state, bind)?.await
}

fn fatal(err: AppError) -> std::io::Error {
    tracing::error!(error = %err, "Failed to start");
    std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
}
