//! Tasknest application binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Initialize tracing
//! 3. Open the JSON file stores
//! 4. Serve the axum REST API until shutdown

mod cli;

use clap::Parser;

use tasknest_api::routes;
use tasknest_api::state::AppState;
use tasknest_core::config::TasknestConfig;

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. Loaded before tracing so the file can set the log level.
    let config_file = args.resolve_config_path();
    let loaded = TasknestConfig::load_optional(&config_file);
    let mut config = match &loaded {
        Ok(Some(config)) => config.clone(),
        Ok(None) | Err(_) => TasknestConfig::default(),
    };
    args.apply(&mut config);

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    tracing::info!("Starting Tasknest v{}", env!("CARGO_PKG_VERSION"));
    match loaded {
        Ok(Some(_)) => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Ok(None) => tracing::info!(
            path = %config_file.display(),
            "No config file, using defaults"
        ),
        Err(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
    }

    // Storage.
    let state = match AppState::open(config.clone()) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(data_dir = %config.storage.data_dir, error = %e, "Failed to open data files");
            return Err(e.into());
        }
    };
    tracing::info!(
        users = %config.users_path().display(),
        todos = %config.todos_path().display(),
        "Data files opened"
    );

    // API server.
    routes::start_server(&config, state).await?;

    Ok(())
}
