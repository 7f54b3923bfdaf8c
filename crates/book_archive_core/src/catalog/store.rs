//! Catalog store
//!
//! Holds the authoritative in-memory copy of the remote collection and mediates every mutation
//! through a [`BookApi`]. Local state only changes after the remote call has reported success, and
//! only while the store's [`LivenessToken`] is still alive.
use crate::api::BookApi;
use crate::catalog::cover::normalize;
use crate::catalog::liveness::LivenessToken;
use crate::catalog::search::filter_books;
use crate::catalog::seed::sample_books;
use crate::catalog::types::{Book, BookId, BookPatch, NewBook};
use log::{debug, info, warn};
use tokio::sync::RwLock;

/// Mutable state behind the store's lock.
#[derive(Debug, Default)]
struct CatalogState {
    /// Full catalog, in insertion order
    books: Vec<Book>,
    /// Current search query
    query: String,
    /// Filtered view, recomputed whenever `books` or `query` change
    visible: Vec<Book>,
    loading: bool,
    /// Set once the initial load has started; seeding never runs again afterwards
    loaded: bool,
}

impl CatalogState {
    fn refresh_view(&mut self) {
        self.visible = filter_books(&self.books, &self.query);
    }

    fn position(&self, id: &BookId) -> Option<usize> {
        self.books.iter().position(|book| book.has_id(id))
    }
}

/// Snapshot of the store for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    pub books: Vec<Book>,
    pub visible: Vec<Book>,
    pub query: String,
    pub loading: bool,
}

/// How the initial load went.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The remote collection already had records.
    Loaded { count: usize },
    /// The remote collection was empty and sample records were created.
    Seeded { created: usize, count: usize },
    /// The catalog had been loaded before; nothing was fetched.
    AlreadyLoaded,
    /// The owner went away before the load finished; nothing was published.
    Abandoned,
}

pub struct CatalogStore<A: BookApi> {
    api: A,
    state: RwLock<CatalogState>,
    liveness: LivenessToken,
}

impl<A: BookApi> CatalogStore<A> {
    #[must_use]
    #[inline]
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: RwLock::new(CatalogState::default()),
            liveness: LivenessToken::new(),
        }
    }

    /// Token observed by in-flight operations; revoke it (or call [`Self::shutdown`]) when the
    /// consumer of this store goes away.
    #[must_use]
    #[inline]
    pub fn liveness(&self) -> LivenessToken {
        self.liveness.clone()
    }

    /// Stop applying the results of operations that resolve from now on.
    #[inline]
    pub fn shutdown(&self) {
        self.liveness.revoke();
    }

    #[must_use]
    #[inline]
    pub const fn api(&self) -> &A {
        &self.api
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "Called once per render")]
    pub async fn view(&self) -> CatalogView {
        let state = self.state.read().await;
        CatalogView {
            books: state.books.clone(),
            visible: state.visible.clone(),
            query: state.query.clone(),
            loading: state.loading,
        }
    }

    /// Look up a record by identifier in the full catalog.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn find(&self, id: &BookId) -> Option<Book> {
        let state = self.state.read().await;
        state.books.iter().find(|book| book.has_id(id)).cloned()
    }

    /// Run the initial load, seeding the remote collection with sample records if it is empty.
    ///
    /// Only the first call talks to the endpoint. Later calls return
    /// [`LoadOutcome::AlreadyLoaded`], even if the catalog has become empty in the meantime.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called once at start of program")]
    pub async fn load(&self) -> LoadOutcome {
        {
            let mut state = self.state.write().await;
            if state.loaded {
                debug!("Catalog already loaded, skipping initial load");
                return LoadOutcome::AlreadyLoaded;
            }
            state.loaded = true;
            state.loading = true;
        }

        let liveness = self.liveness();
        let mut books = self.api.list().await;
        let mut created = None;

        if books.is_empty() {
            info!("Remote catalog is empty, creating sample books");
            let mut count = 0_usize;
            // One at a time, so the samples keep their order on the remote side
            for sample in sample_books() {
                if self.api.create(&sample).await.is_some() {
                    count = count.saturating_add(1);
                } else {
                    warn!("Failed to create sample book {:?}", sample.title);
                }
            }
            created = Some(count);
            books = self.api.list().await;
        }

        if !liveness.is_alive() {
            debug!("Catalog owner went away during initial load, dropping result");
            return LoadOutcome::Abandoned;
        }

        let books: Vec<Book> = books.into_iter().map(normalize).collect();
        let count = books.len();
        let mut state = self.state.write().await;
        state.books = books;
        state.loading = false;
        state.refresh_view();
        info!("Loaded {count} books");

        match created {
            Some(created) => LoadOutcome::Seeded { created, count },
            None => LoadOutcome::Loaded { count },
        }
    }

    /// Create a record remotely and append it locally.
    ///
    /// Returns the stored record, or `None` if the endpoint did not accept it.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn create(&self, record: NewBook) -> Option<Book> {
        let liveness = self.liveness();
        let created = self.api.create(&record).await?;
        if !liveness.is_alive() {
            debug!("Catalog owner went away, not applying create of {:?}", record.title);
            return None;
        }

        let created = normalize(created);
        let mut state = self.state.write().await;
        if let Some(id) = &created.id {
            if state.position(id).is_some() {
                warn!("Endpoint returned existing id {id} for a new book, keeping the old record");
                return None;
            }
        }
        state.books.push(created.clone());
        state.refresh_view();
        Some(created)
    }

    /// Update a record remotely and merge the response into the local copy, in place.
    ///
    /// Returns the merged record, or `None` if the call failed or no such record is held.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn update(&self, id: &BookId, patch: BookPatch) -> Option<Book> {
        let liveness = self.liveness();
        let response = self.api.update(id, &patch).await?;
        if !liveness.is_alive() {
            debug!("Catalog owner went away, not applying update of {id}");
            return None;
        }

        let mut state = self.state.write().await;
        let Some(position) = state.position(id) else {
            warn!("Updated book {id} is not in the local catalog");
            return None;
        };
        let slot = state.books.get_mut(position)?;
        let merged = normalize(slot.clone().merge(response));
        slot.clone_from(&merged);
        state.refresh_view();
        Some(merged)
    }

    /// Set the favorite flag of a record. Only the flag changes locally on success.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn toggle_favorite(&self, id: &BookId, is_favorite: bool) -> bool {
        let liveness = self.liveness();
        if self
            .api
            .update(id, &BookPatch::favorite(is_favorite))
            .await
            .is_none()
        {
            return false;
        }
        if !liveness.is_alive() {
            debug!("Catalog owner went away, not applying favorite change of {id}");
            return false;
        }

        let mut state = self.state.write().await;
        let Some(position) = state.position(id) else {
            warn!("Favorited book {id} is not in the local catalog");
            return false;
        };
        if let Some(book) = state.books.get_mut(position) {
            book.is_favorite = is_favorite;
        }
        state.refresh_view();
        true
    }

    /// Delete a record remotely and drop it locally. Confirmation is up to the caller.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn delete(&self, id: &BookId) -> bool {
        let liveness = self.liveness();
        if !self.api.delete(id).await {
            return false;
        }
        if !liveness.is_alive() {
            debug!("Catalog owner went away, not applying delete of {id}");
            return false;
        }

        let mut state = self.state.write().await;
        state.books.retain(|book| !book.has_id(id));
        state.refresh_view();
        true
    }

    /// Replace the search query and recompute the filtered view.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn set_query(&self, query: impl Into<String>) {
        let mut state = self.state.write().await;
        state.query = query.into();
        state.refresh_view();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test fixtures are fixed and valid")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// In-memory stand-in for the remote collection.
    #[derive(Default)]
    struct FakeApi {
        books: Mutex<Vec<Book>>,
        next_id: Mutex<u32>,
        /// Operations that fail when called
        failing: Mutex<Vec<&'static str>>,
        calls: Mutex<Vec<String>>,
        /// Revoked during the next remote call, to simulate the owner going away mid-flight
        revoke_during_call: Mutex<Option<LivenessToken>>,
        /// Fields reported back by updates instead of the echoed patch
        update_response: Mutex<Option<BookPatch>>,
        /// Identifier handed out by the next create instead of a fresh one
        reused_id: Mutex<Option<BookId>>,
    }

    impl FakeApi {
        fn with_books(books: Vec<Book>) -> Self {
            let fake = Self::default();
            *fake.next_id.lock().unwrap() = 100;
            *fake.books.lock().unwrap() = books;
            fake
        }

        fn fail(&self, operation: &'static str) {
            self.failing.lock().unwrap().push(operation);
        }

        fn record(&self, call: String) -> bool {
            if let Some(token) = self.revoke_during_call.lock().unwrap().take() {
                token.revoke();
            }
            let operation = call.split(' ').next().unwrap_or_default().to_owned();
            self.calls.lock().unwrap().push(call);
            !self
                .failing
                .lock()
                .unwrap()
                .iter()
                .any(|failing| *failing == operation)
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl BookApi for FakeApi {
        async fn list(&self) -> Vec<Book> {
            if !self.record("list".to_owned()) {
                return Vec::new();
            }
            self.books.lock().unwrap().clone()
        }

        async fn create(&self, record: &NewBook) -> Option<Book> {
            if !self.record(format!("create {}", record.title)) {
                return None;
            }
            let id = match self.reused_id.lock().unwrap().take() {
                Some(id) => id,
                None => {
                    let mut next_id = self.next_id.lock().unwrap();
                    *next_id += 1;
                    BookId::new(next_id.to_string())
                }
            };
            let book = Book::new(Some(id), record.clone());
            self.books.lock().unwrap().push(book.clone());
            Some(book)
        }

        async fn update(&self, id: &BookId, patch: &BookPatch) -> Option<BookPatch> {
            if !self.record(format!("update {id}")) {
                return None;
            }
            Some(
                self.update_response
                    .lock()
                    .unwrap()
                    .clone()
                    .unwrap_or_else(|| patch.clone()),
            )
        }

        async fn delete(&self, id: &BookId) -> bool {
            if !self.record(format!("delete {id}")) {
                return false;
            }
            self.books.lock().unwrap().retain(|book| !book.has_id(id));
            true
        }
    }

    fn book(id: &str, title: &str, author: &str, cover: &str) -> Book {
        Book::new(
            Some(BookId::new(id)),
            NewBook::new(title, author, format!("About {title}"), cover, false),
        )
    }

    fn shelf() -> Vec<Book> {
        vec![
            book("1", "Dune", "Herbert", "https://covers/1"),
            book("2", "Foundation", "Asimov", ""),
            book("3", "Hyperion", "Simmons", "https://covers/3"),
        ]
    }

    async fn loaded_store() -> CatalogStore<FakeApi> {
        let store = CatalogStore::new(FakeApi::with_books(shelf()));
        store.load().await;
        store
    }

    fn ids(books: &[Book]) -> Vec<String> {
        books
            .iter()
            .map(|book| book.id.as_ref().map(ToString::to_string).unwrap_or_default())
            .collect()
    }

    #[tokio::test]
    async fn load_publishes_normalized_catalog() {
        let store = CatalogStore::new(FakeApi::with_books(shelf()));

        assert_eq!(store.load().await, LoadOutcome::Loaded { count: 3 });

        let view = store.view().await;
        assert!(!view.loading);
        assert_eq!(ids(&view.books), vec!["1", "2", "3"]);
        assert_eq!(view.visible, view.books);
        assert_eq!(view.books[1].cover_image, "https://picsum.photos/seed/2/300/450");
        assert!(view.books.iter().all(|book| !book.cover_image.trim().is_empty()));
        assert_eq!(store.api().calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn empty_remote_is_seeded_sequentially_then_reloaded() {
        let store = CatalogStore::new(FakeApi::with_books(Vec::new()));

        assert_eq!(
            store.load().await,
            LoadOutcome::Seeded {
                created: 5,
                count: 5
            }
        );

        assert_eq!(
            store.api().calls(),
            vec![
                "list",
                "create The Last Lantern",
                "create Echoes of Tomorrow",
                "create A Walk Through Shadows",
                "create The Paper Compass",
                "create Fragments of Light",
                "list",
            ]
        );
        let view = store.view().await;
        assert_eq!(ids(&view.books), vec!["101", "102", "103", "104", "105"]);
        assert!(view.books[0].is_favorite);
    }

    #[tokio::test]
    async fn partial_seeding_is_kept() {
        let api = FakeApi::with_books(Vec::new());
        api.fail("create");
        let store = CatalogStore::new(api);

        assert_eq!(
            store.load().await,
            LoadOutcome::Seeded {
                created: 0,
                count: 0
            }
        );
        assert!(store.view().await.books.is_empty());
    }

    #[tokio::test]
    async fn load_runs_once_and_never_reseeds() {
        let store = loaded_store().await;
        for id in ["1", "2", "3"] {
            assert!(store.delete(&BookId::new(id)).await);
        }
        assert!(store.view().await.books.is_empty());

        assert_eq!(store.load().await, LoadOutcome::AlreadyLoaded);

        assert!(store.view().await.books.is_empty());
        assert!(!store.api().calls().iter().any(|call| call.starts_with("create")));
        assert_eq!(store.api().calls().iter().filter(|call| *call == "list").count(), 1);
    }

    #[tokio::test]
    async fn create_appends_normalized_record() {
        let store = loaded_store().await;

        let created = store
            .create(NewBook::new("Solaris", "Lem", "", " ", false))
            .await
            .unwrap();

        assert_eq!(created.id, Some(BookId::new("101")));
        assert_eq!(created.cover_image, "https://picsum.photos/seed/101/300/450");
        let view = store.view().await;
        assert_eq!(ids(&view.books), vec!["1", "2", "3", "101"]);
        assert_eq!(view.books.last(), Some(&created));
    }

    #[tokio::test]
    async fn failed_create_leaves_catalog_unchanged() {
        let store = loaded_store().await;
        store.api().fail("create");
        let before = store.view().await;

        let created = store
            .create(NewBook::new("Solaris", "Lem", "", "https://covers/s", false))
            .await;

        assert_eq!(created, None);
        assert_eq!(store.view().await, before);
    }

    #[tokio::test]
    async fn create_never_holds_two_records_with_one_id() {
        let store = loaded_store().await;
        let before = store.view().await;
        *store.api().reused_id.lock().unwrap() = Some(BookId::new("2"));

        let created = store
            .create(NewBook::new("Solaris", "Lem", "", "https://covers/s", false))
            .await;

        assert_eq!(created, None);
        assert_eq!(store.view().await, before);
        assert_eq!(store.api().calls().last().unwrap(), "create Solaris");
    }

    #[tokio::test]
    async fn update_replaces_in_place_and_keeps_unspecified_fields() {
        let store = loaded_store().await;
        let before = store.view().await.books;
        let patch = BookPatch::from(NewBook::new(
            "Dune Messiah",
            "Frank Herbert",
            "About Dune",
            "https://covers/1",
            false,
        ));
        *store.api().update_response.lock().unwrap() = Some(BookPatch {
            title: Some("Dune Messiah".to_owned()),
            ..BookPatch::default()
        });

        let updated = store.update(&BookId::new("1"), patch).await.unwrap();

        let after = store.view().await.books;
        assert_eq!(ids(&after), vec!["1", "2", "3"]);
        assert_eq!(after[0], updated);
        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(updated.author, before[0].author);
        assert_eq!(updated.description, before[0].description);
        assert_eq!(&after[1..], &before[1..]);
    }

    #[tokio::test]
    async fn update_normalizes_blanked_cover() {
        let store = loaded_store().await;
        *store.api().update_response.lock().unwrap() = Some(BookPatch {
            cover_image: Some(String::new()),
            ..BookPatch::default()
        });

        let updated = store
            .update(&BookId::new("3"), BookPatch::default())
            .await
            .unwrap();

        assert_eq!(updated.cover_image, "https://picsum.photos/seed/3/300/450");
    }

    #[tokio::test]
    async fn failed_update_leaves_catalog_unchanged() {
        let store = loaded_store().await;
        store.api().fail("update");
        let before = store.view().await;

        assert_eq!(
            store
                .update(&BookId::new("1"), BookPatch::favorite(true))
                .await,
            None
        );
        assert!(!store.toggle_favorite(&BookId::new("1"), true).await);
        assert_eq!(store.view().await, before);
    }

    #[tokio::test]
    async fn toggle_favorite_flips_only_the_flag() {
        let store = loaded_store().await;
        let before = store.view().await.books;
        // Whatever else the endpoint reports must not leak into the record
        *store.api().update_response.lock().unwrap() = Some(BookPatch {
            title: Some("Something else".to_owned()),
            is_favorite: Some(true),
            ..BookPatch::default()
        });

        assert!(store.toggle_favorite(&BookId::new("2"), true).await);

        let after = store.view().await.books;
        assert!(after[1].is_favorite);
        assert_eq!(
            Book {
                is_favorite: false,
                ..after[1].clone()
            },
            before[1]
        );
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
        assert_eq!(store.api().calls().last().unwrap(), "update 2");
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_record() {
        let store = loaded_store().await;

        assert!(store.delete(&BookId::new("2")).await);

        assert_eq!(ids(&store.view().await.books), vec!["1", "3"]);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_a_noop() {
        let store = loaded_store().await;
        let before = store.view().await;

        assert!(store.delete(&BookId::new("404")).await);

        assert_eq!(store.view().await, before);
    }

    #[tokio::test]
    async fn failed_delete_leaves_catalog_unchanged() {
        let store = loaded_store().await;
        store.api().fail("delete");
        let before = store.view().await;

        assert!(!store.delete(&BookId::new("1")).await);

        assert_eq!(store.view().await, before);
    }

    #[tokio::test]
    async fn query_filters_view_and_follows_mutations() {
        let store = loaded_store().await;

        store.set_query("ON").await;
        let view = store.view().await;
        assert_eq!(ids(&view.visible), vec!["2", "3"]);
        assert_eq!(view.books.len(), 3);

        store
            .create(NewBook::new("Solaris", "Stanislaw Lem", "", "https://covers/s", false))
            .await
            .unwrap();
        assert_eq!(ids(&store.view().await.visible), vec!["2", "3"]);

        store
            .create(NewBook::new("The Moon", "Simmons", "", "https://covers/m", false))
            .await
            .unwrap();
        assert_eq!(ids(&store.view().await.visible), vec!["2", "3", "102"]);

        assert!(store.delete(&BookId::new("3")).await);
        assert_eq!(ids(&store.view().await.visible), vec!["2", "102"]);

        store.set_query("").await;
        let view = store.view().await;
        assert_eq!(view.visible, view.books);
    }

    #[tokio::test]
    async fn results_after_shutdown_are_not_applied() {
        let store = loaded_store().await;
        let before = store.view().await;
        *store.api().revoke_during_call.lock().unwrap() = Some(store.liveness());

        let created = store
            .create(NewBook::new("Solaris", "Lem", "", "https://covers/s", false))
            .await;

        assert_eq!(created, None);
        assert_eq!(store.view().await, before);
        assert!(!store.delete(&BookId::new("1")).await);
        assert!(!store.toggle_favorite(&BookId::new("1"), true).await);
        assert_eq!(store.view().await, before);
    }

    #[tokio::test]
    async fn load_abandoned_when_owner_leaves() {
        let store = CatalogStore::new(FakeApi::with_books(shelf()));
        *store.api().revoke_during_call.lock().unwrap() = Some(store.liveness());

        assert_eq!(store.load().await, LoadOutcome::Abandoned);
        assert!(store.view().await.books.is_empty());
    }
}
