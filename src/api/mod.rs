//! HTTP API.
//!
//! Exposes the advisory, AI and news flows as JSON endpoints under `/api/`.
//! Protected routes pass through a middleware stack: Auth → Audit → Handler.
//!
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{build_context, start_server, ApiServer, ServerError};
pub use types::ApiContext;
