//! Message resource handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::error::ApiError;
use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MessageInput {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageLookup {
    #[serde(default)]
    pub title: Option<String>,
}

#[instrument(skip(state, payload))]
pub async fn save_message(
    State(state): State<AppState>,
    payload: Result<Json<MessageInput>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(input) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    state.messages.save(input.title, input.body);
    Ok(Json(json!({ "message": "Message saved successfully." })))
}

#[instrument(skip(state))]
pub async fn get_message(
    State(state): State<AppState>,
    Query(lookup): Query<MessageLookup>,
) -> Response {
    match lookup.title.and_then(|title| state.messages.get(&title)) {
        Some(message) => Json(message).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Message not found." })),
        )
            .into_response(),
    }
}
