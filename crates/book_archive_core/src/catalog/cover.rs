//! Cover image normalization
//!
//! Every record kept in the catalog has a usable cover URL. Records that arrive without one get a
//! placeholder image seeded by their identifier, or by the current time if they have none yet.
use crate::catalog::types::{Book, BookId};
use chrono::{DateTime, Utc};

/// Placeholder image service, takes an arbitrary seed and renders a stable image for it.
const PLACEHOLDER_HOST: &str = "https://picsum.photos/seed";
/// Cover dimensions used by the placeholder, portrait 2:3.
const PLACEHOLDER_SIZE: &str = "300/450";

/// Placeholder cover URL for an arbitrary seed.
#[must_use]
#[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
pub fn seeded_cover_url(seed: &str) -> String {
    format!("{PLACEHOLDER_HOST}/{seed}/{PLACEHOLDER_SIZE}")
}

/// Build the fallback cover URL for a record.
#[must_use]
#[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
pub fn fallback_cover_url(id: Option<&BookId>, now: DateTime<Utc>) -> String {
    match id {
        Some(id) => seeded_cover_url(id.as_str()),
        None => seeded_cover_url(&format!("seed-{}", now.timestamp_millis())),
    }
}

/// Whether the cover field needs replacing
#[must_use]
#[inline]
pub fn is_missing(cover_image: &str) -> bool {
    cover_image.trim().is_empty()
}

/// Assign a fallback cover if the record's one is missing or blank, at the given instant.
#[must_use]
#[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
pub fn normalize_at(mut book: Book, now: DateTime<Utc>) -> Book {
    if is_missing(&book.cover_image) {
        book.cover_image = fallback_cover_url(book.id.as_ref(), now);
    }
    book
}

/// Assign a fallback cover if the record's one is missing or blank.
#[must_use]
#[inline]
pub fn normalize(book: Book) -> Book {
    normalize_at(book, Utc::now())
}
