use crate::api::BookApi;
use crate::api::errors::ApiError;
use crate::catalog::types::{Book, BookId, BookPatch, NewBook};
use log::{debug, error};
use reqwest::{ClientBuilder, header};

/// `reqwest`-backed client for one REST collection resource, e.g.
/// `https://<project>.mockapi.io/api/books`.
#[derive(Debug, Clone)]
pub struct BookApiClient {
    /// A HTTP client reused for every request against the collection
    http_client: reqwest::Client,
    /// Collection URL without trailing slash
    endpoint: String,
}

impl BookApiClient {
    /// Create a client for the collection at `endpoint`.
    /// # Errors
    /// Fails if `endpoint` is not an absolute http(s) URL, or if the HTTP client cannot be built.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called once at start of program")]
    pub fn new(endpoint: &str) -> Result<Self, ApiError> {
        let endpoint = endpoint.trim().trim_end_matches('/');
        let has_host = endpoint
            .strip_prefix("https://")
            .or_else(|| endpoint.strip_prefix("http://"))
            .is_some_and(|rest| !rest.is_empty());
        if !has_host {
            return Err(ApiError::InvalidEndpoint(endpoint.to_owned()));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let http_client = ClientBuilder::new()
            .user_agent(concat!("book-archive/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            endpoint: endpoint.to_owned(),
        })
    }

    #[must_use]
    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn record_url(&self, id: &BookId) -> String {
        format!("{}/{id}", self.endpoint)
    }

    async fn try_list(&self) -> Result<Vec<Book>, ApiError> {
        let books = self
            .http_client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(books)
    }

    async fn try_create(&self, record: &NewBook) -> Result<Book, ApiError> {
        let book = self
            .http_client
            .post(&self.endpoint)
            .json(record)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(book)
    }

    async fn try_update(&self, id: &BookId, patch: &BookPatch) -> Result<BookPatch, ApiError> {
        let updated = self
            .http_client
            .put(self.record_url(id))
            .json(patch)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(updated)
    }

    async fn try_delete(&self, id: &BookId) -> Result<(), ApiError> {
        self.http_client
            .delete(self.record_url(id))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

impl BookApi for BookApiClient {
    async fn list(&self) -> Vec<Book> {
        match self.try_list().await {
            Ok(books) => {
                debug!("Fetched {} books from {}", books.len(), self.endpoint);
                books
            }
            Err(err) => {
                error!("Error fetching books: {err}");
                Vec::new()
            }
        }
    }

    async fn create(&self, record: &NewBook) -> Option<Book> {
        self.try_create(record)
            .await
            .inspect_err(|err| error!("Error creating book {:?}: {err}", record.title))
            .ok()
    }

    async fn update(&self, id: &BookId, patch: &BookPatch) -> Option<BookPatch> {
        self.try_update(id, patch)
            .await
            .inspect_err(|err| error!("Error updating book {id}: {err}"))
            .ok()
    }

    async fn delete(&self, id: &BookId) -> bool {
        self.try_delete(id)
            .await
            .inspect_err(|err| error!("Error deleting book {id}: {err}"))
            .is_ok()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "Test server setup is local and guaranteed to succeed"
)]
mod tests {
    use super::*;
    use crate::catalog::store::{CatalogStore, LoadOutcome};
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::{get, put};
    use axum::{Json, Router};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    /// Requests seen by the fake endpoint, as "METHOD path body"
    type Seen = Arc<Mutex<Vec<String>>>;

    async fn list_books(State(seen): State<Seen>) -> Json<Value> {
        seen.lock().unwrap().push("GET /books".to_owned());
        Json(json!([
            { "id": "1", "title": "Dune", "author": "Herbert", "coverImage": "" },
            { "id": "2", "title": "Foundation", "author": "Asimov", "isFavorite": true }
        ]))
    }

    /// A collection as left behind by clients that write `null` for optional fields
    async fn list_sparse_books(State(seen): State<Seen>) -> Json<Value> {
        seen.lock().unwrap().push("GET /sparse".to_owned());
        Json(json!([
            {
                "id": "1",
                "title": "Dune",
                "author": "Herbert",
                "description": "Spice.",
                "coverImage": "https://covers/dune",
                "isFavorite": true
            },
            {
                "id": "2",
                "title": "Foundation",
                "author": "Asimov",
                "description": null,
                "coverImage": null,
                "isFavorite": null
            }
        ]))
    }

    async fn create_book(State(seen): State<Seen>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        seen.lock().unwrap().push(format!("POST /books {body}"));
        let mut created = body;
        created["id"] = json!("42");
        (StatusCode::CREATED, Json(created))
    }

    async fn update_book(
        State(seen): State<Seen>,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> Result<Json<Value>, StatusCode> {
        seen.lock().unwrap().push(format!("PUT /books/{id} {body}"));
        if id == "missing" {
            return Err(StatusCode::NOT_FOUND);
        }
        let mut updated = body;
        updated["id"] = json!(id);
        Ok(Json(updated))
    }

    async fn delete_book(State(seen): State<Seen>, Path(id): Path<String>) -> StatusCode {
        seen.lock().unwrap().push(format!("DELETE /books/{id}"));
        if id == "missing" {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::OK
        }
    }

    /// Serve a fake `/books` collection on an ephemeral port and return its URL.
    async fn serve() -> (String, Seen) {
        let seen = Seen::default();
        let app = Router::new()
            .route("/books", get(list_books).post(create_book))
            .route("/sparse", get(list_sparse_books))
            .route("/books/{id}", put(update_book).delete(delete_book))
            .with_state(Arc::clone(&seen));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{address}/books"), seen)
    }

    /// An endpoint on a port nobody listens on.
    async fn closed_endpoint() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{address}/books")
    }

    #[test]
    fn rejects_relative_or_empty_endpoints() {
        for endpoint in ["", "books", "ftp://host/books", "https://"] {
            assert!(
                matches!(BookApiClient::new(endpoint), Err(ApiError::InvalidEndpoint(_))),
                "endpoint {endpoint:?}"
            );
        }
    }

    #[test]
    fn trims_trailing_slash() {
        let client = BookApiClient::new("https://example.com/api/books/").unwrap();
        assert_eq!(client.endpoint(), "https://example.com/api/books");
        assert_eq!(
            client.record_url(&BookId::new("3")),
            "https://example.com/api/books/3"
        );
    }

    #[tokio::test]
    async fn list_decodes_collection() {
        let (url, seen) = serve().await;
        let client = BookApiClient::new(&url).unwrap();

        let books = client.list().await;

        assert_eq!(books.len(), 2);
        assert_eq!(books[0].id, Some(BookId::new("1")));
        assert_eq!(books[1].title, "Foundation");
        assert!(books[1].is_favorite);
        assert_eq!(*seen.lock().unwrap(), vec!["GET /books".to_owned()]);
    }

    #[tokio::test]
    async fn null_fields_do_not_hide_a_populated_catalog() {
        let (url, seen) = serve().await;
        let client = BookApiClient::new(&url.replace("/books", "/sparse")).unwrap();

        let books = client.list().await;
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].cover_image, "");

        let store = CatalogStore::new(client);
        assert_eq!(store.load().await, LoadOutcome::Loaded { count: 2 });

        let view = store.view().await;
        assert_eq!(
            view.books[1].cover_image,
            "https://picsum.photos/seed/2/300/450"
        );
        assert!(!view.books[1].is_favorite);
        assert!(
            !seen
                .lock()
                .unwrap()
                .iter()
                .any(|request| request.starts_with("POST"))
        );
    }

    #[tokio::test]
    async fn create_posts_record_without_id() {
        let (url, seen) = serve().await;
        let client = BookApiClient::new(&url).unwrap();
        let record = NewBook::new("Dune", "Herbert", "Spice.", "https://covers/dune", false);

        let created = client.create(&record).await.unwrap();

        assert_eq!(created, Book::new(Some(BookId::new("42")), record));
        let requests = seen.lock().unwrap();
        assert!(requests[0].starts_with("POST /books {"));
        assert!(!requests[0].contains("\"id\""));
    }

    #[tokio::test]
    async fn update_puts_partial_fields() {
        let (url, seen) = serve().await;
        let client = BookApiClient::new(&url).unwrap();

        let updated = client
            .update(&BookId::new("7"), &BookPatch::favorite(true))
            .await
            .unwrap();

        assert_eq!(updated, BookPatch::favorite(true));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![r#"PUT /books/7 {"isFavorite":true}"#.to_owned()]
        );
    }

    #[tokio::test]
    async fn non_success_status_becomes_sentinel() {
        let (url, _seen) = serve().await;
        let client = BookApiClient::new(&url).unwrap();
        let missing = BookId::new("missing");

        assert_eq!(client.update(&missing, &BookPatch::favorite(false)).await, None);
        assert!(!client.delete(&missing).await);
        assert!(client.delete(&BookId::new("3")).await);
    }

    #[tokio::test]
    async fn transport_failure_becomes_sentinel() {
        let client = BookApiClient::new(&closed_endpoint().await).unwrap();
        let record = NewBook::new("Dune", "Herbert", "", "https://covers/dune", false);
        let id = BookId::new("1");

        assert!(client.list().await.is_empty());
        assert_eq!(client.create(&record).await, None);
        assert_eq!(client.update(&id, &BookPatch::favorite(true)).await, None);
        assert!(!client.delete(&id).await);
    }
}
