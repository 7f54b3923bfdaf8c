//! Sample records used to provision an empty remote catalog on first start.
use crate::catalog::types::NewBook;

/// Titles of the sample records, also used to randomize editor drafts.
pub const SAMPLE_TITLES: [&str; 5] = [
    "The Last Lantern",
    "Echoes of Tomorrow",
    "A Walk Through Shadows",
    "The Paper Compass",
    "Fragments of Light",
];

pub const SAMPLE_AUTHORS: [&str; 5] = [
    "Maya Cohen",
    "Daniel Levi",
    "Yael Abram",
    "Eden Barak",
    "Noam Shalev",
];

pub const SAMPLE_DESCRIPTIONS: [&str; 5] = [
    "A gripping tale of love and loss across changing seasons.",
    "An unexpected journey that questions everything you know.",
    "A poetic exploration of memory, identity, and time.",
    "A fast-paced mystery with twists at every turn.",
    "A heartwarming story about finding home in unlikely places.",
];

const SAMPLE_FAVORITES: [bool; 5] = [true, false, true, false, false];

/// The five sample records, in the order they are created.
#[must_use]
#[allow(clippy::missing_inline_in_public_items, reason = "Called once at start of program")]
pub fn sample_books() -> Vec<NewBook> {
    SAMPLE_TITLES
        .iter()
        .zip(SAMPLE_AUTHORS)
        .zip(SAMPLE_DESCRIPTIONS)
        .zip(SAMPLE_FAVORITES)
        .zip(1_u8..)
        .map(|((((title, author), description), favorite), number)| {
            NewBook::new(
                *title,
                author,
                description,
                format!("https://picsum.photos/seed/book{number}/300/450"),
                favorite,
            )
        })
        .collect()
}
