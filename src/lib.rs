pub mod advisory; // Weather health advisories
pub mod api; // HTTP surface
pub mod auth;
pub mod config;
pub mod news; // Health headlines
pub mod pipeline; // Structured AI assistants

use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Server(#[from] api::ServerError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Start the service and block until Ctrl-C.
pub fn run() -> Result<(), AppError> {
    // A missing .env file is normal in deployed environments.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let app_config = config::AppConfig::from_env()?;
    let ctx = api::build_context(&app_config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let server = api::start_server(ctx, app_config.bind_addr).await?;
        tracing::info!(addr = %server.local_addr, "Listening");

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {e}");
        }

        server.shutdown().await;
        Ok::<(), AppError>(())
    })?;

    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
