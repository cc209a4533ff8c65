//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! 1. CORS → 2. Auth validator → 3. Audit logger

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Request body cap: a 20 MB base64 image plus the JSON envelope.
pub const MAX_BODY_BYTES: usize = 21 * 1024 * 1024;

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Build the API router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer).
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
pub fn api_router(ctx: ApiContext) -> Router {
    // Layers are applied from bottom (innermost) to top (outermost):
    //   Extension (outermost) → Auth → Audit (innermost) → Handler
    let protected = Router::new()
        .route("/advisory", post(endpoints::advisory::from_observation))
        .route("/advisory/forecast", get(endpoints::advisory::forecast))
        .route("/ai/symptoms", post(endpoints::ai::symptoms))
        .route("/ai/remedy", post(endpoints::ai::remedy))
        .route("/ai/lab-report", post(endpoints::ai::lab_report))
        .route("/ai/prescription", post(endpoints::ai::prescription))
        .route("/chat", post(endpoints::chat::send))
        .route("/news", get(endpoints::news::list))
        .with_state(ctx.clone())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        // Extension must be outermost so middleware can extract ApiContext
        .layer(axum::Extension(ctx));

    // Unprotected routes
    let unprotected = Router::new().route("/health", get(endpoints::health::check));

    Router::new()
        .nest("/api", unprotected.merge(protected))
        .layer(cors_layer())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::advisory::{validate_coordinates, WeatherError, WeatherObservation, WeatherSource};
    use crate::auth::{Identity, Role, StaticTokenAuth};
    use crate::news::{NewsError, NewsQuery, NewsSource, RawArticle};
    use crate::pipeline::{AiError, HealthAssistant, MockLlmClient};

    const TOKEN: &str = "test-token";

    struct StubWeather;

    impl WeatherSource for StubWeather {
        fn daily_observation(
            &self,
            latitude: f64,
            longitude: f64,
        ) -> Result<WeatherObservation, WeatherError> {
            validate_coordinates(latitude, longitude)?;
            Ok(WeatherObservation {
                max_temp_c: Some(37.0),
                min_temp_c: Some(27.0),
                precipitation_mm: Some(0.0),
                uv_index: Some(9.0),
            })
        }
    }

    struct StubNews(Result<Vec<RawArticle>, NewsError>);

    impl NewsSource for StubNews {
        fn top_headlines(&self, _query: &NewsQuery) -> Result<Vec<RawArticle>, NewsError> {
            self.0.clone()
        }
    }

    fn context(llm: Arc<MockLlmClient>, news: StubNews) -> ApiContext {
        let auth = StaticTokenAuth::new().with_token(
            TOKEN,
            Identity {
                uid: "patient-1".into(),
                email: "patient@example.com".into(),
                role: Role::Patient,
            },
        );
        ApiContext::new(
            HealthAssistant::new(llm),
            Arc::new(news),
            Arc::new(StubWeather),
            Arc::new(auth),
        )
    }

    fn app_with(llm: Arc<MockLlmClient>) -> Router {
        api_router(context(llm, StubNews(Ok(vec![]))))
    }

    fn make_request(
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<&str>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header("Authorization", format!("Bearer {t}"));
        }
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 65536)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_needs_no_auth() {
        let app = app_with(Arc::new(MockLlmClient::new("{}")));
        let response = app
            .oneshot(make_request("GET", "/api/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["name"], "Healthwise");
    }

    #[tokio::test]
    async fn protected_route_requires_auth() {
        let app = app_with(Arc::new(MockLlmClient::new("{}")));
        let response = app
            .oneshot(make_request("POST", "/api/advisory", None, Some("{}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "AUTH_REQUIRED");
    }

    #[tokio::test]
    async fn invalid_token_returns_401() {
        let app = app_with(Arc::new(MockLlmClient::new("{}")));
        let response = app
            .oneshot(make_request("GET", "/api/news", Some("wrong"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn advisory_from_observation() {
        let app = app_with(Arc::new(MockLlmClient::new("{}")));
        let response = app
            .oneshot(make_request(
                "POST",
                "/api/advisory",
                Some(TOKEN),
                Some(r#"{"maxTempC": 38.0, "uvIndex": 3.0}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");
        assert!(response.headers().contains_key("x-request-id"));
        let json = response_json(response).await;
        assert_eq!(json["risks"][0], "Heatstroke & Dehydration");
        assert!(json.get("fallbackMessage").is_none());
    }

    #[tokio::test]
    async fn malformed_json_body_returns_json_400() {
        let app = app_with(Arc::new(MockLlmClient::new("{}")));
        let response = app
            .oneshot(make_request("POST", "/api/advisory", Some(TOKEN), Some("{not json")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn forecast_fetches_then_predicts() {
        let app = app_with(Arc::new(MockLlmClient::new("{}")));
        let response = app
            .oneshot(make_request(
                "GET",
                "/api/advisory/forecast?lat=28.6&lon=77.2",
                Some(TOKEN),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["observation"]["uvIndex"], 9.0);
        assert_eq!(json["advisory"]["risks"][0], "High UV Exposure");
    }

    #[tokio::test]
    async fn forecast_rejects_out_of_range_coordinates() {
        let app = app_with(Arc::new(MockLlmClient::new("{}")));
        let response = app
            .oneshot(make_request(
                "GET",
                "/api/advisory/forecast?lat=120&lon=0",
                Some(TOKEN),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn symptoms_validation_fails_before_model_call() {
        let llm = Arc::new(MockLlmClient::new("{}"));
        let app = app_with(llm.clone());
        let response = app
            .oneshot(make_request(
                "POST",
                "/api/ai/symptoms",
                Some(TOKEN),
                Some(r#"{"text": "cough"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn symptoms_returns_normalized_result() {
        let llm = Arc::new(MockLlmClient::new(
            r#"{"possibleConditions": [{"name": "Migraine", "description": "Recurring headaches."}]}"#,
        ));
        let app = app_with(llm);
        let response = app
            .oneshot(make_request(
                "POST",
                "/api/ai/symptoms",
                Some(TOKEN),
                Some(r#"{"text": "pounding headache with light sensitivity"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["possibleConditions"][0]["name"], "Migraine");
        assert_eq!(json["suggestedNextSteps"], serde_json::json!([]));
        assert!(!json["disclaimer"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn remedy_content_blocked_returns_422() {
        let llm = Arc::new(MockLlmClient::failing(AiError::ContentBlocked("SAFETY".into())));
        let app = app_with(llm);
        let response = app
            .oneshot(make_request(
                "POST",
                "/api/ai/remedy",
                Some(TOKEN),
                Some(r#"{"text": "sore throat"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn chat_model_failure_is_200_error_variant() {
        let llm = Arc::new(MockLlmClient::failing(AiError::ModelUnavailable(
            "timeout".into(),
        )));
        let app = app_with(llm);
        let response = app
            .oneshot(make_request(
                "POST",
                "/api/chat",
                Some(TOKEN),
                Some(r#"{"text": "Is it safe to take ibuprofen with food?"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["type"], "error");
        assert!(json["errorMessage"].is_string());
    }

    #[tokio::test]
    async fn chat_empty_message_returns_400() {
        let app = app_with(Arc::new(MockLlmClient::new("{}")));
        let response = app
            .oneshot(make_request("POST", "/api/chat", Some(TOKEN), Some(r#"{"text": "  "}"#)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn news_maps_articles() {
        let news = StubNews(Ok(vec![RawArticle {
            title: Some("Staying safe in a heatwave".into()),
            ..Default::default()
        }]));
        let app = api_router(context(Arc::new(MockLlmClient::new("{}")), news));
        let response = app
            .oneshot(make_request("GET", "/api/news?pageSize=5", Some(TOKEN), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json[0]["title"], "Staying safe in a heatwave");
        assert_eq!(json[0]["articleUrl"], "#");
    }

    #[tokio::test]
    async fn news_upstream_failure_returns_502() {
        let news = StubNews(Err(NewsError::Upstream {
            status: 500,
            message: "unexpectedError".into(),
        }));
        let app = api_router(context(Arc::new(MockLlmClient::new("{}")), news));
        let response = app
            .oneshot(make_request("GET", "/api/news", Some(TOKEN), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn news_invalid_category_returns_400() {
        let app = app_with(Arc::new(MockLlmClient::new("{}")));
        let response = app
            .oneshot(make_request("GET", "/api/news?category=gossip", Some(TOKEN), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn not_found_for_unknown_route() {
        let app = app_with(Arc::new(MockLlmClient::new("{}")));
        let response = app
            .oneshot(make_request("GET", "/api/nonexistent", Some(TOKEN), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
