//! # Catalog Router
//!
//! Maps a browser location (path + query string) to one of a fixed set
//! of pages and keeps a single current [`Route`] in sync with history
//! traversal.
//!
//! - [`resolve`] is a pure, total function: every location maps to
//!   exactly one [`Route`], falling back to [`Route::NotFound`].
//! - [`RouteTable`] holds the matching rules as an ordered, inspectable
//!   list evaluated first-match-wins.
//! - [`History`] models the session history; back/forward traversal is
//!   reported to listeners through the [`NavigationSource`] trait.
//! - [`Router`] owns the current-route cell and delivers every change to
//!   its subscribers in order. Dropping a [`Subscription`] revokes it.
//!
//! ```rust
//! use catalog_router::{resolve, Location, Route};
//!
//! let route = resolve(&Location::parse("/category/backgrounds"));
//! assert_eq!(route, Route::Category { slug: "backgrounds".into() });
//!
//! let route = resolve(&Location::parse("/search?q=cat"));
//! assert_eq!(route, Route::Search { query: "cat".into() });
//! ```

mod history;
mod location;
mod queue;
mod route;
mod router;
mod table;

pub use history::{History, ListenerId, NavigationSource, TraversalListener};
pub use location::Location;
pub use route::{Route, RouteKind};
pub use router::{Router, Subscription};
pub use table::{resolve, Extractor, PathPattern, RouteRule, RouteTable};
