#![no_main]

use catalog_router::{resolve, Location, Route};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(href) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing and resolution are total.
    let location = Location::parse(href);
    let route = resolve(&location);

    // Same location, same route.
    assert_eq!(resolve(&location), route);

    // A route's own href resolves back to it.
    if route != Route::NotFound {
        assert_eq!(resolve(&Location::parse(&route.href())), route);
    }

    // Splitting path and query by hand agrees with href parsing.
    let (path, query) = match href.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (href, None),
    };
    let _ = resolve(&Location::from_parts(path, query));
});
