//! NDJSON feed of newly added books.

use axum::body::Body;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use futures::stream::{self, Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;

use super::state::AppState;
use crate::store::{Book, BookStore};

const NDJSON: &str = "application/x-ndjson";

/// Poll `store` every `poll_every` and yield each book not yet seen, in id
/// order. The first poll happens immediately.
pub fn book_feed(store: Arc<BookStore>, poll_every: Duration) -> impl Stream<Item = Book> {
    let mut last_id = 0;
    IntervalStream::new(tokio::time::interval(poll_every))
        .map(move |_| {
            let fresh = store.after(last_id);
            if let Some(newest) = fresh.last() {
                last_id = newest.id;
            }
            stream::iter(fresh)
        })
        .flatten()
}

/// `GET /books/stream`: one JSON object per line, kept open indefinitely.
pub async fn stream_books(State(state): State<AppState>) -> Response {
    let lines = book_feed(state.books.clone(), state.stream_poll_interval).map(|book| {
        serde_json::to_string(&book).map(|mut line| {
            line.push('\n');
            line
        })
    });

    ([(CONTENT_TYPE, NDJSON)], Body::from_stream(lines)).into_response()
}
