//! In-memory record stores backing the REST API.

mod books;
mod messages;

pub use books::{
    Book, BookPage, BookQuery, BookStore, BookUpdate, NewBook, SortField, SortKey,
};
pub use messages::{Message, MessageStore};
