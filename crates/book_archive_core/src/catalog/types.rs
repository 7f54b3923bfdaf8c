use core::fmt;
use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` like an absent key. The endpoint stores whatever the last writer sent, so
/// optional fields show up as `null` as often as they are left out.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifier assigned by the remote endpoint on creation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    #[must_use]
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    #[inline]
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// A book record as held by the catalog and returned by the remote endpoint.
#[non_exhaustive]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Absent until the endpoint has accepted the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    pub title: String,
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// May arrive blank or `null` from the endpoint, see [`crate::catalog::cover`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub cover_image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_favorite: bool,
}

impl Book {
    #[must_use]
    #[inline]
    pub fn new(id: Option<BookId>, record: NewBook) -> Self {
        Self {
            id,
            title: record.title,
            author: record.author,
            description: record.description,
            cover_image: record.cover_image,
            is_favorite: record.is_favorite,
        }
    }

    /// Whether this record carries the given identifier.
    #[must_use]
    #[inline]
    pub fn has_id(&self, id: &BookId) -> bool {
        self.id.as_ref() == Some(id)
    }

    /// Merge an update response over this record.
    ///
    /// Every field reported by the endpoint replaces the local value; fields it left out keep
    /// their previous value. The identifier is always the one this record already had, whatever
    /// the response says.
    #[must_use]
    #[inline]
    pub fn merge(self, patch: BookPatch) -> Self {
        let BookPatch {
            title,
            author,
            description,
            cover_image,
            is_favorite,
        } = patch;

        Self {
            id: self.id,
            title: title.unwrap_or(self.title),
            author: author.unwrap_or(self.author),
            description: description.unwrap_or(self.description),
            cover_image: cover_image.unwrap_or(self.cover_image),
            is_favorite: is_favorite.unwrap_or(self.is_favorite),
        }
    }
}

/// Request body for creating a record; everything but the identifier.
#[non_exhaustive]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: String,
    pub is_favorite: bool,
}

impl NewBook {
    #[must_use]
    #[inline]
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
        cover_image: impl Into<String>,
        is_favorite: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            description: description.into(),
            cover_image: cover_image.into(),
            is_favorite,
        }
    }
}

/// Partial field set, used both as the body of an update and to decode its response.
///
/// Unset fields are left out of the request body entirely. An `id` in a response is ignored.
#[non_exhaustive]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

impl BookPatch {
    /// A patch touching only the favorite flag.
    #[must_use]
    #[inline]
    pub const fn favorite(is_favorite: bool) -> Self {
        Self {
            title: None,
            author: None,
            description: None,
            cover_image: None,
            is_favorite: Some(is_favorite),
        }
    }
}

impl From<NewBook> for BookPatch {
    #[inline]
    fn from(record: NewBook) -> Self {
        Self {
            title: Some(record.title),
            author: Some(record.author),
            description: Some(record.description),
            cover_image: Some(record.cover_image),
            is_favorite: Some(record.is_favorite),
        }
    }
}
