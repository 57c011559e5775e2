//! Browser locations.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::{form_urlencoded, Url};

use crate::Route;

static BASE: Lazy<Option<Url>> = Lazy::new(|| Url::parse("http://localhost/").ok());

/// A path plus its decoded query parameters.
///
/// The path is kept exactly as the browser reports it (still
/// percent-encoded). Query values are decoded; when a key repeats, the
/// first value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    path: String,
    #[serde(default)]
    query: BTreeMap<String, String>,
}

impl Location {
    /// Creates a location with an empty query. A missing leading `/` is added.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self {
            path,
            query: BTreeMap::new(),
        }
    }

    /// Builder-style helper that sets one query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Parses an href such as `/search?q=cat#results`.
    ///
    /// The href is resolved against the site root, so dot segments are
    /// collapsed and unsafe characters are percent-encoded the same way
    /// the browser does before exposing `pathname`. The fragment is dropped.
    ///
    /// An href that leaves the site, such as `//other.example/asset/x` or
    /// `https://other.example/`, does not keep its path: it becomes the
    /// not-found location so it can never resolve to a catalog page.
    pub fn parse(href: &str) -> Self {
        let Some(base) = BASE.as_ref() else {
            return Self::split(href);
        };
        match base.join(href.trim()) {
            Ok(url) if url.origin() != base.origin() => Self::new(Route::NotFound.href()),
            Ok(url) => Self::from_parts(url.path(), url.query()),
            Err(_) => Self::split(href),
        }
    }

    fn split(href: &str) -> Self {
        let without_fragment = href.split('#').next().unwrap_or_default();
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (without_fragment, None),
        };
        Self::from_parts(path, query)
    }

    /// Builds a location from a raw path and an optional raw query string,
    /// as found in an HTTP request line.
    pub fn from_parts(path: &str, query: Option<&str>) -> Self {
        let mut location = Self::new(path);
        if let Some(query) = query {
            for (key, value) in form_urlencoded::parse(query.as_bytes()) {
                location
                    .query
                    .entry(key.into_owned())
                    .or_insert_with(|| value.into_owned());
            }
        }
        location
    }

    /// The path, starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// All query parameters.
    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    /// A single query parameter.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Re-encodes the location as an href.
    pub fn href(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{}", self.path, query)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

impl From<&str> for Location {
    fn from(href: &str) -> Self {
        Self::parse(href)
    }
}
