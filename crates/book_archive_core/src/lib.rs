//! `book_archive_core`
//!
//! Core library for the platform-independent logic of the Book Archive: the typed client for the
//! remote `/books` resource, and the in-memory catalog that mirrors it. The console front end only
//! forwards user intents to the [`catalog::store::CatalogStore`] and renders what it publishes.

pub mod api;

pub mod catalog;

pub use catalog::types::{Book, BookId, BookPatch, NewBook};
