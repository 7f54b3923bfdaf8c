//! Catalog
//!
//! The in-memory, ordered collection of book records mirrored from the remote endpoint, together
//! with the rules applied to it: cover normalization, seeding, merging and searching.
pub mod cover;
pub mod draft;
pub mod liveness;
pub mod search;
pub mod seed;
pub mod store;
pub mod types;
