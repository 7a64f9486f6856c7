//! Book records with filtering, sorting and pagination.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;
use tracing::debug;

/// Largest page size a client may request.
pub const MAX_PER_PAGE: u32 = 100;
/// Page size used when the client does not ask for one.
const DEFAULT_PER_PAGE: u32 = 5;

/// Titles the store starts with.
const SEED_BOOKS: &[(&str, &str)] = &[
    ("The Great Gatsby", "F. Scott Fitzgerald"),
    ("1984", "George Orwell"),
    ("To Kill a Mockingbird", "Harper Lee"),
    ("Pride and Prejudice", "Jane Austen"),
    ("Moby Dick", "Herman Melville"),
    ("War and Peace", "Leo Tolstoy"),
    ("The Catcher in the Rye", "J.D. Salinger"),
    ("The Hobbit", "J.R.R. Tolkien"),
    ("Ulysses", "James Joyce"),
    ("The Odyssey", "Homer"),
    ("Crime and Punishment", "Fyodor Dostoevsky"),
    ("Brave New World", "Aldous Huxley"),
    ("The Divine Comedy", "Dante Alighieri"),
    ("The Brothers Karamazov", "Fyodor Dostoevsky"),
    ("Anna Karenina", "Leo Tolstoy"),
    ("One Hundred Years of Solitude", "Gabriel Garcia Marquez"),
    ("Wuthering Heights", "Emily Bronte"),
    ("Great Expectations", "Charles Dickens"),
    ("The Iliad", "Homer"),
    ("Jane Eyre", "Charlotte Bronte"),
    ("A Tale of Two Cities", "Charles Dickens"),
    ("The Great Adventure", "Leo Tolstoy"),
    ("The Shadow and the Wind", "Carlos Ruiz Zafon"),
    ("The Great Wave", "Hokusai"),
    ("The Wind-Up Bird Chronicle", "Haruki Murakami"),
    ("Norwegian Wood", "Haruki Murakami"),
    ("Kafka on the Shore", "Haruki Murakami"),
    ("The Brothers", "Fyodor Dostoevsky"),
    ("The Great Sea", "David Abulafia"),
    ("The Catcher of Tales", "Leo Tolstoy"),
];

/// A stored book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub author: String,
}

/// A book to be created; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
}

/// Partial update of a book. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

/// Field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Author,
}

impl SortField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "title" => Some(SortField::Title),
            "author" => Some(SortField::Author),
            _ => None,
        }
    }

    fn value(self, book: &Book) -> &str {
        match self {
            SortField::Title => &book.title,
            SortField::Author => &book.author,
        }
    }
}

/// One key of a `sort` parameter: `title`, `+title` or `-title`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl SortKey {
    /// Parse a comma-separated key list such as `author,-title`.
    /// Keys naming an unknown field are skipped.
    pub fn parse_list(raw: &str) -> Vec<SortKey> {
        raw.split(',')
            .filter_map(|key| {
                let key = key.trim();
                let descending = key.starts_with('-');
                let field = SortField::parse(key.trim_start_matches(['+', '-']))?;
                Some(SortKey { field, descending })
            })
            .collect()
    }

    fn compare(&self, a: &Book, b: &Book) -> Ordering {
        let ordering = self.field.value(a).cmp(self.field.value(b));
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Listing parameters, as taken from the query string.
#[derive(Debug, Clone, Deserialize)]
pub struct BookQuery {
    /// Case-insensitive substring match on the author
    #[serde(default)]
    pub author: Option<String>,
    /// Case-insensitive substring match on the title
    #[serde(default)]
    pub title: Option<String>,
    /// Comma-separated sort keys, see [`SortKey::parse_list`]
    #[serde(default)]
    pub sort: Option<String>,
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for BookQuery {
    fn default() -> Self {
        Self {
            author: None,
            title: None,
            sort: None,
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl BookQuery {
    /// Check the pagination bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("page must be 1 or greater".to_string());
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(format!("per_page must be between 1 and {}", MAX_PER_PAGE));
        }
        Ok(())
    }

    pub fn sort_keys(&self) -> Vec<SortKey> {
        self.sort.as_deref().map(SortKey::parse_list).unwrap_or_default()
    }

    fn matches(&self, book: &Book) -> bool {
        let contains = |haystack: &str, needle: &Option<String>| match needle {
            Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        };
        contains(&book.author, &self.author) && contains(&book.title, &self.title)
    }
}

/// One page of a book listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPage {
    pub page: u32,
    pub per_page: u32,
    pub total_pages: usize,
    /// Number of books matching the filters, across all pages
    pub total_books: usize,
    pub books: Vec<Book>,
}

/// Thread-safe in-memory book store keyed by id.
#[derive(Debug, Default)]
pub struct BookStore {
    books: RwLock<BTreeMap<u64, Book>>,
}

impl BookStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the seed catalogue.
    pub fn seeded() -> Self {
        let store = Self::new();
        for (title, author) in SEED_BOOKS {
            store.create(NewBook {
                title: title.to_string(),
                author: author.to_string(),
            });
        }
        store
    }

    /// List books matching `query`, sorted and paginated.
    pub fn list(&self, query: &BookQuery) -> BookPage {
        let mut matching: Vec<Book> = self
            .books
            .read()
            .values()
            .filter(|book| query.matches(book))
            .cloned()
            .collect();

        // Ties, and listings without sort keys, fall back to id order.
        let keys = query.sort_keys();
        matching.sort_by(|a, b| {
            keys.iter()
                .map(|key| key.compare(a, b))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.id.cmp(&b.id))
        });

        let total_books = matching.len();
        let per_page = query.per_page as usize;
        let offset = (query.page.saturating_sub(1) as usize).saturating_mul(per_page);
        let books = matching.into_iter().skip(offset).take(per_page).collect();

        BookPage {
            page: query.page,
            per_page: query.per_page,
            total_pages: total_books.div_ceil(per_page.max(1)),
            total_books,
            books,
        }
    }

    pub fn get(&self, id: u64) -> Option<Book> {
        self.books.read().get(&id).cloned()
    }

    /// Insert a book with the next free id (highest id plus one).
    pub fn create(&self, new_book: NewBook) -> Book {
        let mut books = self.books.write();
        let id = books.keys().next_back().map_or(1, |last| last + 1);
        let book = Book {
            id,
            title: new_book.title,
            author: new_book.author,
        };
        books.insert(id, book.clone());
        debug!(id, "Book created");
        book
    }

    /// Apply a partial update. Returns `None` if the book does not exist.
    pub fn update(&self, id: u64, update: BookUpdate) -> Option<Book> {
        let mut books = self.books.write();
        let book = books.get_mut(&id)?;
        if let Some(title) = update.title {
            book.title = title;
        }
        if let Some(author) = update.author {
            book.author = author;
        }
        Some(book.clone())
    }

    /// Remove a book. Returns whether it existed.
    pub fn delete(&self, id: u64) -> bool {
        self.books.write().remove(&id).is_some()
    }

    /// Books with an id greater than `last_id`, in id order.
    pub fn after(&self, last_id: u64) -> Vec<Book> {
        self.books
            .read()
            .range((Bound::Excluded(last_id), Bound::Unbounded))
            .map(|(_, book)| book.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.read().is_empty()
    }
}
