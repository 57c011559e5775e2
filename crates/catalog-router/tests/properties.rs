//! Property tests for location resolution.

use catalog_router::{resolve, Location, Route};
use proptest::prelude::*;

fn is_routed(path: &str) -> bool {
    path == "/" || path == "/search" || path.starts_with("/category/") || path.starts_with("/asset/")
}

fn query_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-z]{1,4}", "[ -~]{0,12}"), 0..4)
}

fn location(path: &str, pairs: &[(String, String)]) -> Location {
    pairs
        .iter()
        .fold(Location::new(path), |location, (k, v)| location.with_query(k, v))
}

/// A parameter value that survives being placed in a path segment.
fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{0,24}"
}

proptest! {
    /// Property: anything outside the four patterns is NotFound, whatever the query.
    #[test]
    fn prop_unmatched_paths_are_not_found(
        path in "/[a-z0-9/_.-]{0,30}",
        pairs in query_strategy(),
    ) {
        prop_assume!(!is_routed(&path));
        prop_assert_eq!(resolve(&location(&path, &pairs)), Route::NotFound);
    }

    /// Property: resolution has no hidden state.
    #[test]
    fn prop_resolve_is_idempotent(
        path in "/[a-z0-9/?=&%_.-]{0,30}",
        pairs in query_strategy(),
    ) {
        let location = location(&path, &pairs);
        prop_assert_eq!(resolve(&location), resolve(&location));
    }

    /// Property: the category remainder is carried verbatim.
    #[test]
    fn prop_category_slug_verbatim(rest in "[a-z0-9/%_-]{0,30}") {
        let path = format!("/category/{rest}");
        prop_assert_eq!(resolve(&Location::new(path)), Route::category(rest));
    }

    /// Property: hrefs produced by routes resolve back to the same route.
    #[test]
    fn prop_href_resolves_back(
        slug in segment_strategy(),
        asset_id in segment_strategy(),
        query in "[ -~]{0,20}",
    ) {
        for route in [
            Route::Home,
            Route::category(slug.clone()),
            Route::asset(asset_id.clone()),
            Route::search(query.clone()),
            Route::NotFound,
        ] {
            prop_assert_eq!(resolve(&Location::parse(&route.href())), route);
        }
    }

    /// Property: a search location yields its first `q` value or the empty string.
    #[test]
    fn prop_search_reads_q(q in proptest::option::of("[ -~]{0,16}"), pairs in query_strategy()) {
        let mut location = location("/search", &pairs);
        if let Some(q) = &q {
            location = location.with_query("q", q.clone());
        }
        let expected = location.query_param("q").unwrap_or_default().to_string();
        prop_assert_eq!(resolve(&location), Route::search(expected));
    }
}
