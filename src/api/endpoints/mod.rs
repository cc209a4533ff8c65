//! API endpoint handlers.
//!
//! Model, news and weather clients block; handlers move those calls onto
//! the blocking pool with `run_blocking`.

pub mod advisory;
pub mod ai;
pub mod chat;
pub mod health;
pub mod news;

use axum::extract::rejection::{JsonRejection, QueryRejection};

use crate::api::error::ApiError;

/// Run a blocking collaborator call off the async runtime.
pub(crate) async fn run_blocking<F, T, E>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
        .map_err(Into::into)
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
