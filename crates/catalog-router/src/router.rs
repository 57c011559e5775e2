//! The router: current-route cell plus ordered subscriber delivery.

use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

use crate::queue::SerialQueue;
use crate::{ListenerId, Location, NavigationSource, Route, RouteTable};

type Callback = Box<dyn Fn(&Route) + Send + Sync>;

struct Subscriber {
    id: u64,
    /// Sequence number of the subscriber's first delivery. Route changes
    /// queued before it are skipped.
    joined: AtomicU64,
    active: AtomicBool,
    in_call: ReentrantMutex<()>,
    callback: Callback,
}

impl Subscriber {
    fn call(&self, route: &Route) {
        let _in_call = self.in_call.lock();
        if self.active.load(Ordering::Acquire) {
            (self.callback)(route);
        }
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("id", &self.id)
            .field("active", &self.active.load(Ordering::Relaxed))
            .finish()
    }
}

enum Delivery {
    /// Route of the source's location when the subscriber registered.
    Initial(Arc<Subscriber>, Arc<Route>),
    /// Route change after a traversal, for every subscriber that joined
    /// before sequence number `.0`.
    Changed(u64, Arc<Route>),
}

/// Owns the single current [`Route`] and keeps it in sync with a
/// [`NavigationSource`].
///
/// The router registers one traversal listener on its source. Every
/// traversal is resolved once, stored as the new current route, then
/// delivered to each subscriber in subscription order before the next
/// delivery starts. A traversal or subscription made from inside a
/// callback is queued behind the delivery in progress, so every
/// subscriber observes route changes in the order they happened and its
/// last delivered route is [`Router::current`].
///
/// ```rust
/// use std::sync::Arc;
/// use catalog_router::{History, Location, Route, Router};
///
/// let history = Arc::new(History::new(Location::parse("/")));
/// history.push(Location::parse("/asset/abc-123"));
///
/// let router = Router::attach(history.clone());
/// let _subscription = router.subscribe(|route| println!("now showing {route}"));
///
/// history.back();
/// assert_eq!(*router.current(), Route::Home);
/// ```
pub struct Router {
    table: RouteTable,
    source: Arc<dyn NavigationSource>,
    listener: Mutex<Option<ListenerId>>,
    current: RwLock<Arc<Route>>,
    subscribers: Mutex<Vec<Arc<Subscriber>>>,
    deliveries: SerialQueue<Delivery>,
    sequence: AtomicU64,
    next_id: AtomicU64,
}

impl Router {
    /// Attaches a router using the standard routing table.
    pub fn attach<S>(source: Arc<S>) -> Arc<Self>
    where
        S: NavigationSource + 'static,
    {
        Self::with_table(source, RouteTable::standard())
    }

    /// Attaches a router using a custom routing table.
    pub fn with_table<S>(source: Arc<S>, table: RouteTable) -> Arc<Self>
    where
        S: NavigationSource + 'static,
    {
        let source: Arc<dyn NavigationSource> = source;
        let initial = table.resolve(&source.location());

        let router = Arc::new(Self {
            table,
            source: Arc::clone(&source),
            listener: Mutex::new(None),
            current: RwLock::new(Arc::new(initial)),
            subscribers: Mutex::new(Vec::new()),
            deliveries: SerialQueue::new(),
            sequence: AtomicU64::new(0),
            next_id: AtomicU64::new(1),
        });

        let weak: Weak<Self> = Arc::downgrade(&router);
        let id = source.add_listener(Box::new(move |location| {
            if let Some(router) = weak.upgrade() {
                router.on_traverse(location);
            }
        }));
        *router.listener.lock() = Some(id);

        router
    }

    /// The routing table in use.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Snapshot of the current route.
    pub fn current(&self) -> Arc<Route> {
        Arc::clone(&self.current.read())
    }

    /// Resolves a location with this router's table, without changing
    /// the current route.
    pub fn resolve(&self, location: &Location) -> Route {
        self.table.resolve(location)
    }

    /// Registers `callback`.
    ///
    /// The callback runs once with the route of the source's current
    /// location, then once per history traversal until the returned
    /// [`Subscription`] is revoked or dropped. The first call happens
    /// before `subscribe` returns unless a delivery is already in
    /// progress (for example when subscribing from inside a callback),
    /// in which case it runs right after that delivery.
    pub fn subscribe<F>(self: &Arc<Self>, callback: F) -> Subscription
    where
        F: Fn(&Route) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let subscriber = Arc::new(Subscriber {
            id,
            joined: AtomicU64::new(u64::MAX),
            active: AtomicBool::new(true),
            in_call: ReentrantMutex::new(()),
            callback: Box::new(callback),
        });

        let registered = Arc::clone(&subscriber);
        self.deliveries.submit(
            || {
                let (sequence, route) = self.advance(&self.source.location());
                registered.joined.store(sequence, Ordering::Release);
                self.subscribers.lock().push(Arc::clone(&registered));
                trace!(subscriber = id, route = %route, "Subscriber registered");
                Some(Delivery::Initial(registered, route))
            },
            |delivery| self.deliver(delivery),
        );

        Subscription {
            subscriber,
            router: Arc::downgrade(self),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    fn unsubscribe(&self, subscriber: &Subscriber) {
        subscriber.active.store(false, Ordering::Release);
        self.subscribers.lock().retain(|s| s.id != subscriber.id);
        // Waits for a call in progress on another thread; re-entrant from
        // inside the subscriber's own callback.
        drop(subscriber.in_call.lock());
        trace!(subscriber = subscriber.id, "Subscriber removed");
    }

    /// Resolves `location`, stores it as the current route and returns
    /// it with the next sequence number. Runs under the delivery queue lock.
    fn advance(&self, location: &Location) -> (u64, Arc<Route>) {
        let route = Arc::new(self.table.resolve(location));
        *self.current.write() = Arc::clone(&route);
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        (sequence, route)
    }

    fn on_traverse(&self, location: &Location) {
        self.deliveries.submit(
            || {
                let (sequence, route) = self.advance(location);
                debug!(location = %location, route = %route, "Route changed");
                Some(Delivery::Changed(sequence, route))
            },
            |delivery| self.deliver(delivery),
        );
    }

    fn deliver(&self, delivery: Delivery) {
        match delivery {
            Delivery::Initial(subscriber, route) => subscriber.call(&route),
            Delivery::Changed(sequence, route) => {
                let subscribers: Vec<Arc<Subscriber>> = self.subscribers.lock().clone();
                trace!(route = %route, subscribers = subscribers.len(), "Delivering route");
                for subscriber in subscribers {
                    if subscriber.joined.load(Ordering::Acquire) < sequence {
                        subscriber.call(&route);
                    }
                }
            }
        }
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        if let Some(id) = self.listener.get_mut().take() {
            self.source.remove_listener(id);
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("current", &*self.current.read())
            .field("subscribers", &self.subscriber_count())
            .field("rules", &self.table.rules().len())
            .finish()
    }
}

/// Handle to a router subscription. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
#[derive(Debug)]
pub struct Subscription {
    subscriber: Arc<Subscriber>,
    router: Weak<Router>,
}

impl Subscription {
    /// Revokes the subscription. No callback runs after this returns,
    /// apart from the one this is called from.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Returns true while the router is alive and the subscription has
    /// not been revoked.
    pub fn is_active(&self) -> bool {
        self.router.strong_count() > 0 && self.subscriber.active.load(Ordering::Acquire)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(router) = self.router.upgrade() {
            router.unsubscribe(&self.subscriber);
        }
    }
}
