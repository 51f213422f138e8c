use serde::{Deserialize, Serialize};

/// A single catalog record: a movie title plus whatever optional metadata
/// the catalog artifact carried for it.
///
/// Entries are immutable after load. Titles are not guaranteed unique;
/// title lookups resolve duplicates to the lowest catalog index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Display title, as stored in the catalog
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
}

impl Movie {
    /// Creates a title-only entry with no metadata
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            genres: None,
            poster_url: None,
            imdb_id: None,
        }
    }
}
