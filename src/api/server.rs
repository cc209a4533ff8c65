//! API server lifecycle.
//!
//! Binds a TCP listener, spawns the axum server task with graceful
//! shutdown, and returns a handle the caller uses to stop it.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::advisory::OpenMeteoClient;
use crate::api::router::api_router;
use crate::api::types::ApiContext;
use crate::auth::{AuthError, StaticTokenAuth};
use crate::config::AppConfig;
use crate::pipeline::{GeminiClient, HealthAssistant};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to build {client} client: {reason}")]
    Client {
        client: &'static str,
        reason: String,
    },

    #[error("Invalid API token table: {0}")]
    Auth(#[from] AuthError),

    #[error("Failed to bind API server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
}

/// Wire the production collaborators from configuration.
pub fn build_context(config: &AppConfig) -> Result<ApiContext, ServerError> {
    let gemini = GeminiClient::new(
        &config.gemini_url,
        &config.gemini_model,
        config.gemini_api_key.clone(),
        config.http_timeout_secs,
    )
    .map_err(|e| ServerError::Client {
        client: "model",
        reason: e.to_string(),
    })?;

    let news = crate::news::NewsApiClient::new(
        &config.news_url,
        config.news_api_key.clone(),
        config.http_timeout_secs,
    )
    .map_err(|e| ServerError::Client {
        client: "news",
        reason: e.to_string(),
    })?;

    let weather = OpenMeteoClient::new(&config.weather_url, config.http_timeout_secs).map_err(
        |e| ServerError::Client {
            client: "weather",
            reason: e.to_string(),
        },
    )?;

    let auth = match config.api_tokens.as_deref() {
        Some(raw) => StaticTokenAuth::from_config_str(raw)?,
        None => StaticTokenAuth::new(),
    };
    if auth.is_empty() {
        tracing::warn!("No API tokens configured; every protected route will answer 401");
    }
    if config.gemini_api_key.is_none() {
        tracing::warn!("Model API key not configured; AI endpoints will report the model as unavailable");
    }
    if config.news_api_key.is_none() {
        tracing::warn!("News API key not configured; /api/news will fail");
    }

    Ok(ApiContext::new(
        HealthAssistant::new(Arc::new(gemini)),
        Arc::new(news),
        Arc::new(weather),
        Arc::new(auth),
    ))
}

/// Handle to a running API server.
pub struct ApiServer {
    pub local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ApiServer {
    /// Signal graceful shutdown and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
        if let Err(e) = self.task.await {
            tracing::error!("API server task failed: {e}");
        }
    }
}

/// Bind `addr` and serve the API in a background task.
pub async fn start_server(ctx: ApiContext, addr: SocketAddr) -> Result<ApiServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let local_addr = listener
        .local_addr()
        .map_err(|source| ServerError::Bind { addr, source })?;

    let app = api_router(ctx);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(addr = %local_addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        local_addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}
