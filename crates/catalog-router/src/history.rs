//! Session history and traversal notifications.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::queue::SerialQueue;
use crate::Location;

/// Identifier returned when registering a traversal listener.
pub type ListenerId = u64;

/// Callback invoked with the new location after a history traversal.
pub type TraversalListener = Box<dyn Fn(&Location) + Send + Sync>;

/// Where the router reads the current location and learns about
/// back/forward navigation.
pub trait NavigationSource: Send + Sync {
    /// The location currently displayed.
    fn location(&self) -> Location;

    /// Registers a listener for history traversal.
    fn add_listener(&self, listener: TraversalListener) -> ListenerId;

    /// Removes a listener. Returns false if it was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

#[derive(Debug)]
struct Entries {
    stack: Vec<Location>,
    cursor: usize,
}

type SharedListener = Arc<dyn Fn(&Location) + Send + Sync>;

/// In-process model of a browser tab's session history.
///
/// [`History::push`] records a full-document navigation and notifies no
/// one. [`History::back`], [`History::forward`] and [`History::go`] move
/// the cursor and notify every listener with the new location, in
/// registration order. Traversals are serialized: all listeners see one
/// traversal before the next one starts. A traversal requested while
/// listeners are still being notified (for example from inside a
/// listener) moves the cursor at once and is delivered as soon as the
/// running notification finishes, like a queued `popstate`.
pub struct History {
    entries: Mutex<Entries>,
    listeners: RwLock<Vec<(ListenerId, SharedListener)>>,
    traversals: SerialQueue<Location>,
    next_id: AtomicU64,
}

impl History {
    /// Creates a history whose only entry is `initial`.
    pub fn new(initial: Location) -> Self {
        Self {
            entries: Mutex::new(Entries {
                stack: vec![initial],
                cursor: 0,
            }),
            listeners: RwLock::new(Vec::new()),
            traversals: SerialQueue::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Records a full-document navigation to `location`.
    ///
    /// Forward entries are discarded. No listener is notified.
    pub fn push(&self, location: Location) {
        let mut entries = self.entries.lock();
        let keep = entries.cursor + 1;
        entries.stack.truncate(keep);
        entries.stack.push(location);
        entries.cursor = keep;
        trace!(length = entries.stack.len(), "History entry pushed");
    }

    /// Moves one entry back. Returns false at the first entry.
    pub fn back(&self) -> bool {
        self.go(-1)
    }

    /// Moves one entry forward. Returns false at the last entry.
    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Moves `delta` entries. Out-of-range or zero moves do nothing and
    /// return false.
    pub fn go(&self, delta: isize) -> bool {
        self.traversals.submit(
            || {
                let mut entries = self.entries.lock();
                let target = entries.cursor.checked_add_signed(delta)?;
                if delta == 0 || target >= entries.stack.len() {
                    return None;
                }
                entries.cursor = target;
                let location = entries.stack[target].clone();
                debug!(delta, location = %location, "History traversal");
                Some(location)
            },
            |location| self.notify(&location),
        )
    }

    fn notify(&self, location: &Location) {
        let listeners: Vec<SharedListener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(location);
        }
    }

    /// Number of entries. Never zero.
    pub fn entry_count(&self) -> usize {
        self.entries.lock().stack.len()
    }

    /// Index of the current entry.
    pub fn cursor(&self) -> usize {
        self.entries.lock().cursor
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

impl NavigationSource for History {
    fn location(&self) -> Location {
        let entries = self.entries.lock();
        entries.stack[entries.cursor].clone()
    }

    fn add_listener(&self, listener: TraversalListener) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.write().push((id, Arc::from(listener)));
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

impl std::fmt::Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("History")
            .field("entries", &*self.entries.lock())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(paths: &[&str]) -> History {
        let history = History::new(Location::new(paths[0]));
        for path in &paths[1..] {
            history.push(Location::new(*path));
        }
        history
    }

    fn recorder(history: &History) -> Arc<Mutex<Vec<String>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        history.add_listener(Box::new(move |location| {
            sink.lock().push(location.path().to_string());
        }));
        seen
    }

    #[test]
    fn test_push_moves_cursor_without_notifying() {
        let history = History::new(Location::new("/"));
        let seen = recorder(&history);

        history.push(Location::new("/category/icons"));

        assert_eq!(history.cursor(), 1);
        assert_eq!(history.location().path(), "/category/icons");
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_back_and_forward_notify() {
        let history = history_of(&["/", "/category/icons", "/asset/a1"]);
        let seen = recorder(&history);

        assert!(history.back());
        assert!(history.back());
        assert!(history.forward());

        assert_eq!(*seen.lock(), ["/category/icons", "/", "/category/icons"]);
    }

    #[test]
    fn test_traversal_past_ends_is_noop() {
        let history = history_of(&["/", "/search"]);
        let seen = recorder(&history);

        assert!(!history.forward());
        assert!(history.back());
        assert!(!history.back());
        assert!(!history.go(0));
        assert!(!history.go(5));

        assert_eq!(*seen.lock(), ["/"]);
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let history = history_of(&["/", "/a", "/b"]);
        history.go(-2);
        history.push(Location::new("/c"));

        assert_eq!(history.entry_count(), 2);
        assert!(!history.forward());
        assert_eq!(history.location().path(), "/c");
    }

    #[test]
    fn test_traversal_from_listener_is_queued() {
        let history = Arc::new(history_of(&["/", "/a", "/b"]));

        let inner = Arc::clone(&history);
        history.add_listener(Box::new(move |location| {
            if location.path() == "/a" {
                assert!(inner.back());
                assert_eq!(inner.cursor(), 0);
            }
        }));
        let seen = recorder(&history);

        assert!(history.back());

        assert_eq!(*seen.lock(), ["/a", "/"]);
        assert_eq!(history.location().path(), "/");
    }

    #[test]
    fn test_removed_listener_is_not_notified() {
        let history = history_of(&["/", "/a"]);
        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);
        let id = history.add_listener(Box::new(move |_| *sink.lock() += 1));

        assert!(history.remove_listener(id));
        assert!(!history.remove_listener(id));
        history.back();

        assert_eq!(*seen.lock(), 0);
        assert_eq!(history.listener_count(), 0);
    }
}
