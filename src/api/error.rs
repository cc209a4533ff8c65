//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::advisory::WeatherError;
use crate::news::NewsError;
use crate::pipeline::AiError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Content blocked: {0}")]
    ContentBlocked(String),
    #[error("Upstream failure ({code}): {message}")]
    Upstream { code: &'static str, message: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "AUTH_REQUIRED",
                "Authentication required".to_string(),
            ),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::ContentBlocked(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CONTENT_BLOCKED",
                message,
            ),
            ApiError::Upstream { code, message } => (StatusCode::BAD_GATEWAY, code, message),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        let message = err.user_message();
        match err {
            AiError::Validation(_) => ApiError::BadRequest(message),
            AiError::ContentBlocked(_) => ApiError::ContentBlocked(message),
            AiError::ModelUnavailable(_) | AiError::ModelError { .. } => ApiError::Upstream {
                code: "MODEL_UNAVAILABLE",
                message,
            },
            AiError::EmptyModelOutput(_) => ApiError::Upstream {
                code: "MODEL_OUTPUT_UNUSABLE",
                message,
            },
        }
    }
}

impl From<NewsError> for ApiError {
    fn from(err: NewsError) -> Self {
        match err {
            NewsError::InvalidRequest(detail) => ApiError::BadRequest(detail),
            NewsError::MissingApiKey => ApiError::Internal(err.to_string()),
            NewsError::Upstream { status, message } => ApiError::Upstream {
                code: "NEWS_UPSTREAM",
                message: format!("News service error ({status}): {message}"),
            },
            NewsError::Http(_) | NewsError::MalformedResponse(_) => ApiError::Upstream {
                code: "NEWS_UPSTREAM",
                message: "The news service is unavailable right now".to_string(),
            },
        }
    }
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::InvalidCoordinates { .. } => ApiError::BadRequest(err.to_string()),
            WeatherError::Http(_)
            | WeatherError::Upstream { .. }
            | WeatherError::MalformedResponse(_) => {
                tracing::warn!(error = %err, "Weather lookup failed");
                ApiError::Upstream {
                    code: "WEATHER_UPSTREAM",
                    message: "The weather service is unavailable right now".to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_returns_401() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "AUTH_REQUIRED");
    }

    #[tokio::test]
    async fn validation_error_returns_400_with_message() {
        let err: ApiError = AiError::Validation("Please describe your symptoms.".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Please describe your symptoms.");
    }

    #[tokio::test]
    async fn content_blocked_returns_422() {
        let err: ApiError = AiError::ContentBlocked("SAFETY".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "CONTENT_BLOCKED");
    }

    #[tokio::test]
    async fn model_failure_returns_502_without_upstream_body() {
        let err: ApiError = AiError::ModelError {
            status: 500,
            body: "quota exceeded for project 1234".into(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "MODEL_UNAVAILABLE");
        assert!(!json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("quota"));
    }

    #[tokio::test]
    async fn news_upstream_keeps_status_and_message() {
        let err: ApiError = NewsError::Upstream {
            status: 429,
            message: "rateLimited".into(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "News service error (429): rateLimited");
    }

    #[tokio::test]
    async fn internal_returns_500() {
        let response = ApiError::Internal("something broke".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        // Internal errors hide details from client
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn invalid_coordinates_return_400() {
        let err: ApiError = WeatherError::InvalidCoordinates {
            latitude: 91.0,
            longitude: 0.0,
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
