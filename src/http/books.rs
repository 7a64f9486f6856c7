//! Book resource handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{info, instrument};

use super::error::ApiError;
use super::state::AppState;
use crate::store::{Book, BookPage, BookQuery, BookUpdate, NewBook};

const BOOK_NOT_FOUND: &str = "Book not found";

/// Body of a create request. Both fields are required but checked by hand so
/// a missing field gets the same error as an empty one.
#[derive(Debug, Deserialize)]
pub struct BookInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

#[instrument(skip(state, query))]
pub async fn list_books(
    State(state): State<AppState>,
    query: Result<Query<BookQuery>, QueryRejection>,
) -> Result<Json<BookPage>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    query.validate().map_err(ApiError::BadRequest)?;
    Ok(Json(state.books.list(&query)))
}

#[instrument(skip(state))]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Book>, ApiError> {
    state
        .books
        .get(id)
        .map(Json)
        .ok_or(ApiError::NotFound(BOOK_NOT_FOUND))
}

#[instrument(skip(state, payload))]
pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let Json(input) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let (Some(title), Some(author)) = (input.title, input.author) else {
        return Err(missing_fields());
    };
    if title.trim().is_empty() || author.trim().is_empty() {
        return Err(missing_fields());
    }

    let book = state.books.create(NewBook { title, author });
    info!(id = book.id, "Book added");
    Ok((StatusCode::CREATED, Json(book)))
}

#[instrument(skip(state, payload))]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    payload: Result<Json<BookUpdate>, JsonRejection>,
) -> Result<Json<Book>, ApiError> {
    let Json(update) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    state
        .books
        .update(id, update)
        .map(Json)
        .ok_or(ApiError::NotFound(BOOK_NOT_FOUND))
}

#[instrument(skip(state))]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    if state.books.delete(id) {
        info!(id, "Book deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(BOOK_NOT_FOUND))
    }
}

fn missing_fields() -> ApiError {
    ApiError::BadRequest("Missing required book fields (title, author)".to_string())
}
