//! `POST /api/chat`: health chatbot.
//!
//! Model failures come back as `200` with `{type: "error", errorMessage}`;
//! only input validation produces a `400`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};

use crate::api::endpoints::run_blocking;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth::Identity;
use crate::pipeline::{ChatbotQuery, ChatbotResult};

pub async fn send(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<ChatbotQuery>, JsonRejection>,
) -> Result<Json<ChatbotResult>, ApiError> {
    let Json(query) = payload?;
    let assistant = ctx.assistant.clone();
    let result = run_blocking(move || assistant.chat(query)).await?;

    tracing::debug!(uid = %identity.uid, answer_type = result.type_name(), "Chat answered");
    Ok(Json(result))
}
