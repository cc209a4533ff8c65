//! Audit logging middleware.
//!
//! Logs every API request with uid, role, method, path, status and
//! latency. Runs innermost (after auth has injected `Identity`).
//! Request and response bodies are never logged. Each response carries
//! an `X-Request-Id` header matching the audit line.

use std::time::Instant;

use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;

use uuid::Uuid;

use crate::auth::Identity;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let (uid, role) = req
        .extensions()
        .get::<Identity>()
        .map(|i| (i.uid.clone(), i.role.as_str()))
        .unwrap_or_else(|| ("anonymous".to_string(), "none"));

    let request_id = Uuid::new_v4();
    let start = Instant::now();
    let mut response = next.run(req).await;

    tracing::info!(
        target: "audit",
        %request_id,
        %method,
        %path,
        %uid,
        role,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "API access"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
