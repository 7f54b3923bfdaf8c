//! Editor draft
//!
//! The record editor works on a `BookDraft`, which holds the raw field values the user typed. A
//! draft has to pass validation before it is sent anywhere.
use crate::catalog::cover::seeded_cover_url;
use crate::catalog::seed::{SAMPLE_AUTHORS, SAMPLE_DESCRIPTIONS, SAMPLE_TITLES};
use crate::catalog::types::{Book, NewBook};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom as _;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("a title is required")]
    MissingTitle,
    #[error("an author is required")]
    MissingAuthor,
    #[error("a cover image URL is required")]
    MissingCover,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: String,
    pub is_favorite: bool,
}

impl BookDraft {
    /// Pre-fill the editor from an existing record.
    #[must_use]
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            description: book.description.clone(),
            cover_image: book.cover_image.clone(),
            is_favorite: book.is_favorite,
        }
    }

    /// Replace title, author and description with random picks from the sample pools.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(title) = SAMPLE_TITLES.choose(rng) {
            (*title).clone_into(&mut self.title);
        }
        if let Some(author) = SAMPLE_AUTHORS.choose(rng) {
            (*author).clone_into(&mut self.author);
        }
        if let Some(description) = SAMPLE_DESCRIPTIONS.choose(rng) {
            (*description).clone_into(&mut self.description);
        }
    }

    /// Point the cover at a placeholder image seeded by the given instant.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub fn use_seed_cover(&mut self, now: DateTime<Utc>) {
        self.cover_image = seeded_cover_url(&now.timestamp_millis().to_string());
    }

    /// Like [`Self::use_seed_cover`], with a `sample-` seed.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub fn use_sample_cover(&mut self, now: DateTime<Utc>) {
        self.cover_image = seeded_cover_url(&format!("sample-{}", now.timestamp_millis()));
    }

    /// Check the required fields and produce the record to submit.
    ///
    /// # Errors
    /// Fails if the title, the author or the cover URL is blank.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub fn validate(&self) -> Result<NewBook, DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::MissingTitle);
        }
        if self.author.trim().is_empty() {
            return Err(DraftError::MissingAuthor);
        }
        if self.cover_image.trim().is_empty() {
            return Err(DraftError::MissingCover);
        }
        Ok(NewBook::new(
            self.title.clone(),
            self.author.clone(),
            self.description.clone(),
            self.cover_image.clone(),
            self.is_favorite,
        ))
    }
}
