//! Search filter
//!
//! The filtered view shown to the user is derived from the full catalog and the query string; it
//! is never stored on its own and never re-sorted.
use crate::catalog::types::Book;

/// Whether a record matches the query, case-insensitively, on title or author.
#[must_use]
#[allow(clippy::missing_inline_in_public_items, reason = "Called once per record")]
pub fn matches(book: &Book, query: &str) -> bool {
    let needle = query.to_lowercase();
    book.title.to_lowercase().contains(&needle) || book.author.to_lowercase().contains(&needle)
}

/// Compute the filtered subsequence of `books` for `query`, preserving order.
#[must_use]
#[allow(clippy::missing_inline_in_public_items, reason = "Called on every catalog change")]
pub fn filter_books(books: &[Book], query: &str) -> Vec<Book> {
    if query.is_empty() {
        return books.to_vec();
    }
    books
        .iter()
        .filter(|book| matches(book, query))
        .cloned()
        .collect()
}
