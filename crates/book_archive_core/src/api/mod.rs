//! Resource client
//!
//! Typed access to the remote `/books` collection. Every operation makes at most one attempt and
//! converts any failure into a sentinel value (empty list, `None` or `false`), so callers only ever
//! ask "did this return something usable?".
pub mod client;
pub mod errors;

use crate::catalog::types::{Book, BookId, BookPatch, NewBook};
use core::future::Future;

/// The four operations the catalog needs from the remote collection.
pub trait BookApi {
    /// Fetch the whole collection, or an empty one on failure.
    fn list(&self) -> impl Future<Output = Vec<Book>> + Send;

    /// Create a record and return it with its server-assigned identifier.
    fn create(&self, record: &NewBook) -> impl Future<Output = Option<Book>> + Send;

    /// Update some fields of a record and return what the endpoint reports back.
    fn update(
        &self,
        id: &BookId,
        patch: &BookPatch,
    ) -> impl Future<Output = Option<BookPatch>> + Send;

    /// Delete a record, `true` if the endpoint accepted it.
    fn delete(&self, id: &BookId) -> impl Future<Output = bool> + Send;
}
