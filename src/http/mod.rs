//! HTTP API for books and messages.
//!
//! Reads are public. Writes to the book catalogue pass through the
//! authentication gate and the per-caller rate limiter first.

mod auth;
mod books;
mod error;
mod messages;
mod middleware;
mod server;
mod state;
mod stream;

pub use auth::AuthGate;
pub use error::{
    insert_rate_limit_headers, ApiError, RATELIMIT_LIMIT, RATELIMIT_REMAINING, RATELIMIT_RESET,
};
pub use middleware::{authenticate, rate_limit, Caller};
pub use server::HttpServer;
pub use state::AppState;
pub use stream::book_feed;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

/// Prefix of all versioned resources.
pub const API_PREFIX: &str = "/api/v1";

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/books", post(books::create_book))
        .route("/books/{id}", put(books::update_book).delete(books::delete_book))
        .route_layer(from_fn_with_state(state.clone(), rate_limit))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    let public = Router::new()
        .route("/books", get(books::list_books))
        .route("/books/stream", get(stream::stream_books))
        .route("/books/{id}", get(books::get_book))
        .route("/messages", get(messages::get_message).post(messages::save_message));

    Router::new()
        .route("/health", get(health))
        .nest(API_PREFIX, public.merge(protected))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
