//! Ordered routing table.

use once_cell::sync::Lazy;

use crate::{Location, Route};

/// Builds a [`Route`] from a matched location and the part of the path
/// left after the pattern (empty for exact matches).
pub type Extractor = fn(&Location, &str) -> Route;

/// How a rule matches a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPattern {
    /// The whole path equals the string.
    Exact(&'static str),
    /// The path starts with the string; the rest is the remainder.
    Prefix(&'static str),
}

impl PathPattern {
    /// Returns the remainder of `path` if it matches.
    pub fn match_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        match self {
            PathPattern::Exact(expected) => (path == *expected).then_some(""),
            PathPattern::Prefix(prefix) => path.strip_prefix(prefix),
        }
    }
}

/// One `(pattern, extractor)` pair.
#[derive(Debug, Clone)]
pub struct RouteRule {
    name: &'static str,
    pattern: PathPattern,
    extract: Extractor,
}

impl RouteRule {
    /// Creates a rule.
    pub fn new(name: &'static str, pattern: PathPattern, extract: Extractor) -> Self {
        Self {
            name,
            pattern,
            extract,
        }
    }

    /// Human-readable rule name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The path pattern.
    pub fn pattern(&self) -> PathPattern {
        self.pattern
    }

    /// Applies the rule, returning `None` when the pattern does not match.
    pub fn apply(&self, location: &Location) -> Option<Route> {
        self.pattern
            .match_path(location.path())
            .map(|rest| (self.extract)(location, rest))
    }
}

/// Rules evaluated in order; the first match wins and no match yields
/// [`Route::NotFound`].
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// A table without rules; everything resolves to [`Route::NotFound`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// The catalog's routes: `/`, `/category/{slug}`, `/asset/{id}`, `/search?q=`.
    pub fn standard() -> Self {
        Self::empty()
            .with_rule(RouteRule::new("home", PathPattern::Exact("/"), |_, _| {
                Route::Home
            }))
            .with_rule(RouteRule::new(
                "category",
                PathPattern::Prefix("/category/"),
                |_, slug| Route::category(slug),
            ))
            .with_rule(RouteRule::new(
                "asset",
                PathPattern::Prefix("/asset/"),
                |_, asset_id| Route::asset(asset_id),
            ))
            .with_rule(RouteRule::new(
                "search",
                PathPattern::Exact("/search"),
                |location, _| Route::search(location.query_param("q").unwrap_or_default()),
            ))
    }

    /// Appends a rule with the lowest precedence.
    pub fn with_rule(mut self, rule: RouteRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Inserts a rule with the highest precedence.
    pub fn with_rule_first(mut self, rule: RouteRule) -> Self {
        self.rules.insert(0, rule);
        self
    }

    /// Rules in precedence order.
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Maps a location to exactly one route.
    pub fn resolve(&self, location: &Location) -> Route {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(location))
            .unwrap_or(Route::NotFound)
    }
}

static STANDARD: Lazy<RouteTable> = Lazy::new(RouteTable::standard);

/// Resolves a location against the standard table.
pub fn resolve(location: &Location) -> Route {
    STANDARD.resolve(location)
}
